//! 下载文件名

use regex::Regex;
use std::sync::OnceLock;

/// 导出文件名: 空白串替换为单个下划线，其余字符保持不变
///
/// `"My Book!"` + `"pdf"` → `My_Book!_Kids_Edition.pdf`
pub fn download_filename(title: &str, extension: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace =
        WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

    format!("{}_Kids_Edition.{}", whitespace.replace_all(title, "_"), extension)
}
