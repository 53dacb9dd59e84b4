//! Prompt Templates - 生成式后端提示词
//!
//! 面向 6-8 岁儿童的改写、插图/视频提示词提取、章节标题与问答

/// 章节标题生成时截取的正文长度
const TITLE_SAMPLE_CHARS: usize = 1000;

const SIMPLIFY_SOURCE_START: &str = "Original text:\n";
const SIMPLIFY_SOURCE_END: &str = "\n\nSimplified story:\n";
const IMAGE_PROMPT_HEADER: &str = "Create ONE vivid image prompt";

/// 儿童版改写
pub fn simplify(text: &str) -> String {
    format!(
        r#"You are rewriting a story for children aged 6-8 years old.

Rules:
1. Use short sentences and simple words
2. Make it engaging and fun, split into small paragraphs
3. Keep the main story elements, remove complex language and dark themes
4. Return ONLY the simplified story text
5. Do NOT include any introductory phrases like "Here is the story" or "Simplified version"
6. Start directly with the story

Original text:
{text}

Simplified story:
"#
    )
}

/// 从改写提示词中取回原文（占位后端原样回显）
pub fn simplify_source(prompt: &str) -> Option<&str> {
    let start = prompt.find(SIMPLIFY_SOURCE_START)? + SIMPLIFY_SOURCE_START.len();
    let end = prompt.rfind(SIMPLIFY_SOURCE_END)?;
    prompt.get(start..end)
}

/// 是否为插图提示词提取请求
pub fn is_image_prompt_request(prompt: &str) -> bool {
    prompt.starts_with(IMAGE_PROMPT_HEADER)
}

/// 同时提取插图与视频提示词（JSON 输出）
pub fn media_prompts(simplified_text: &str) -> String {
    format!(
        r#"Read the following simplified story and extract a short, vivid description for ONE illustration and ONE short video concept suitable for kids.
Return strictly JSON in this format: {{"imagePrompt": "...", "videoPrompt": "..."}}

Story:
{simplified_text}
"#
    )
}

/// 仅提取插图提示词
pub fn image_prompt(simplified_text: &str) -> String {
    format!(
        r#"Create ONE vivid image prompt for a children's book illustration based on this story.

Requirements:
- Colorful and engaging
- Appropriate for kids aged 6-8
- Describe a specific scene from the story
- Return ONLY the image prompt, no extra text

Story:
{simplified_text}

Image prompt:
"#
    )
}

/// 插图风格增强
pub fn illustration_style(image_prompt: &str) -> String {
    format!("Children's book illustration style, colorful and vibrant: {image_prompt}")
}

/// 章节标题（2-3 个词，不含动词）
pub fn chapter_title(chapter_text: &str) -> String {
    let sample: String = chapter_text.chars().take(TITLE_SAMPLE_CHARS).collect();
    format!(
        r#"Generate a concise, meaningful chapter title for this text.

Requirements:
- 2-3 words maximum
- NO verbs (use nouns and adjectives only)
- Capitalize each word (Title Case)
- Should capture the essence/theme of the chapter
- Examples of good titles: "The Time Traveller", "Strange Discovery", "Dark Forest", "Lost Kingdom"
- Return ONLY the title, no quotes, no extra text

Chapter text:
{sample}

Title:
"#
    )
}

/// 关于书籍的单轮问答
pub fn answer_question(book_title: &str, book_context: &str, question: &str) -> String {
    format!(
        r#"You are a friendly reading buddy for children aged 6-8.
Answer the question about the book "{book_title}" using only the story below.
Keep the answer short, warm and simple. If the story does not say, say so kindly.

Story:
{book_context}

Question: {question}

Answer:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_source_recovers_text() {
        let prompt = simplify("Once upon a time.\n\nThe end.");
        assert_eq!(simplify_source(&prompt), Some("Once upon a time.\n\nThe end."));
        assert_eq!(simplify_source(&image_prompt("x")), None);
    }

    #[test]
    fn test_image_prompt_request_detection() {
        assert!(is_image_prompt_request(&image_prompt("A cat.")));
        assert!(!is_image_prompt_request(&chapter_title("A cat.")));
    }

    #[test]
    fn test_media_prompts_requests_json_keys() {
        let prompt = media_prompts("A cat.");
        assert!(prompt.contains(r#"{"imagePrompt": "...", "videoPrompt": "..."}"#));
        assert!(prompt.contains("A cat."));
    }

    #[test]
    fn test_chapter_title_samples_prefix() {
        let text = "x".repeat(5000);
        let prompt = chapter_title(&text);
        assert!(prompt.len() < 2000);
    }

    #[test]
    fn test_answer_question_includes_title_and_question() {
        let prompt = answer_question("Heidi", "Heidi lives on a mountain.", "Where does Heidi live?");
        assert!(prompt.contains("\"Heidi\""));
        assert!(prompt.contains("Where does Heidi live?"));
    }
}
