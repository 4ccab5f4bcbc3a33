use crate::diagnosis::{self, DiagnosisRequest, DiagnosisResult};
use crate::error::AppError;
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

const IMAGE_FIELD: &str = "image";
const CROP_TYPE_FIELD: &str = "cropType";

/// `POST /api/crop-check`: diagnose one uploaded leaf photo.
pub async fn crop_check(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DiagnosisResult>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::InvalidUpload(e.body_text()))?;
    let request = read_upload(&mut multipart).await?;

    tracing::info!(
        crop_type = %request.crop_type,
        mime_type = %request.mime_type,
        image_bytes = request.image_bytes.len(),
        "Diagnosing leaf photo"
    );

    let result = diagnosis::diagnose(state.model.as_ref(), &request).await?;

    tracing::info!(
        is_healthy = result.is_healthy,
        top_condition = result.top_conditions.first().map(|c| c.label.as_str()),
        advice_items = result.advice.len(),
        "Diagnosis complete"
    );

    Ok(Json(result))
}

async fn read_upload(multipart: &mut Multipart) -> Result<DiagnosisRequest, AppError> {
    let mut image: Option<(Vec<u8>, Option<String>)> = None;
    let mut crop_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            IMAGE_FIELD if image.is_none() => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                image = Some((data.to_vec(), content_type));
            }
            CROP_TYPE_FIELD => {
                crop_type = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let (image_bytes, content_type) = image.ok_or_else(|| {
        AppError::InvalidUpload(format!("missing required field `{}`", IMAGE_FIELD))
    })?;

    Ok(DiagnosisRequest::new(
        image_bytes,
        content_type.as_deref(),
        crop_type.as_deref(),
    ))
}
