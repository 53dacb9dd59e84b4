//! 多个命令共用的生成步骤

use crate::application::error::ApplicationError;
use crate::application::ports::{GenerativeBackendPort, TextRequest};
use crate::application::prompts;
use crate::domain::book::ChapterIllustration;
use crate::domain::strip_preamble;

/// 儿童版改写；失败或结果为空时中止
pub(crate) async fn simplify_text(
    backend: &dyn GenerativeBackendPort,
    text: &str,
) -> Result<String, ApplicationError> {
    let reply = backend
        .generate_text(TextRequest::plain(prompts::simplify(text)))
        .await?;

    let simplified = strip_preamble(&reply);
    if simplified.is_empty() {
        return Err(ApplicationError::backend("Simplification returned no text"));
    }
    Ok(simplified)
}

/// 为一段简化文本生成插图提示词与插图
///
/// 后端返回无图片时 image 为空，不视为错误
pub(crate) async fn illustrate(
    backend: &dyn GenerativeBackendPort,
    simplified_text: &str,
) -> Result<ChapterIllustration, ApplicationError> {
    let reply = backend
        .generate_text(TextRequest::plain(prompts::image_prompt(simplified_text)))
        .await?;

    let image_prompt = reply.trim().to_string();
    if image_prompt.is_empty() {
        return Err(ApplicationError::backend("Prompt extraction returned no image prompt"));
    }

    let image = backend
        .generate_image(&prompts::illustration_style(&image_prompt))
        .await?
        .unwrap_or_default();

    Ok(ChapterIllustration::new(image, image_prompt))
}
