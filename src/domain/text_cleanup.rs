//! 文本清理
//!
//! 处理生成模型输出中的常见噪声：开场白、代码围栏、引号等

/// 模型常见的开场白前缀，出现在简化结果开头时去除
const UNWANTED_PREFIXES: &[&str] = &[
    "Here is the story in simple English for children:",
    "Here is the simplified story:",
    "Simplified version:",
    "Here's the story:",
    "Here is the story:",
    "Simplified story:",
    "Story:",
];

/// 去除简化文本开头的模型开场白
pub fn strip_preamble(text: &str) -> String {
    let mut result = text.trim();
    for prefix in UNWANTED_PREFIXES {
        if let Some(rest) = result.strip_prefix(prefix) {
            result = rest.trim_start();
        }
    }
    result.trim().to_string()
}

/// 去除 ```json ... ``` 围栏
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// 规范化章节标题：去引号、限制词数
///
/// 结果为空时返回 None
pub fn normalize_title(raw: &str, max_words: usize) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '"' | '\'')).collect();
    let title = cleaned
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// 按字符数截断，超出时追加 "..."
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}

/// 将文本拆分为非空段落（按行）
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
