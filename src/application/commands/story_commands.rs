//! Story Commands

/// 单章节转换命令：简化 → 提取提示词 → 并发生成图片与视频
#[derive(Debug, Clone)]
pub struct ConvertSingleChapter {
    pub text: String,
}
