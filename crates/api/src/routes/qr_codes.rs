//! QR code endpoint handlers: single codes, batch generation and export.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use persistence::repositories::{NewQrCode, QrCodeRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::owned_menu;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_qr_codes_generated, record_qr_renders_skipped};
use crate::services::{build_archive, render_batch};
use domain::models::{
    BatchQrRequest, CreateQrCodeRequest, ExportFormat, ExportQuery, ListQrCodesResponse, QrCode,
    QrCodeResponse, UpdateQrCodeRequest,
};
use domain::services::{
    check_png_size, plan_batch, plan_single, render_png, render_single, render_svg,
    sanitize_file_name, QrMatrix,
};

/// Number of codes a batch persisted and archived.
pub const BATCH_CREATED_HEADER: &str = "x-batch-created";
/// Number of codes a batch dropped because they failed to render.
pub const BATCH_SKIPPED_HEADER: &str = "x-batch-skipped";

async fn owned_qr_code(state: &AppState, qr_code_id: Uuid, owner_id: Uuid) -> Result<QrCode, ApiError> {
    QrCodeRepository::new(state.pool.clone())
        .find_for_owner(qr_code_id, owner_id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound("QR code not found".to_string()))
}

/// Rejects `additional` new codes when the menu would exceed its cap.
fn ensure_capacity(limit: i64, existing: i64, additional: i64) -> Result<(), ApiError> {
    if existing + additional > limit {
        return Err(ApiError::Conflict(format!(
            "Menu would exceed the maximum number of QR codes ({})",
            limit
        )));
    }
    Ok(())
}

/// Create one QR code with a random code value.
///
/// POST /api/v1/menus/:menu_id/qr-codes
pub async fn create_qr_code(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
    Json(request): Json<CreateQrCodeRequest>,
) -> Result<(StatusCode, Json<QrCodeResponse>), ApiError> {
    request.validate()?;

    let menu = owned_menu(&state, menu_id, user.user_id).await?;

    let planned = plan_single(&state.config.server.public_base_url, menu.id, &request.name);
    // Fail before persisting anything the exporter could not draw
    QrMatrix::for_design(&planned.target_url, &request.design)?;

    let mut tx = state.pool.begin().await?;
    let existing = QrCodeRepository::lock_menu_and_count(&mut tx, menu.id).await?;
    ensure_capacity(state.config.limits.max_qr_codes_per_menu, existing, 1)?;

    let entity = QrCodeRepository::create(
        &mut tx,
        menu.id,
        menu.restaurant_id,
        &NewQrCode {
            name: planned.name,
            code: planned.code,
            target_url: planned.target_url,
        },
        &request.design,
    )
    .await?;
    tx.commit().await?;

    let qr_code: QrCode = entity.into();
    record_qr_codes_generated("single", 1);
    info!(qr_code_id = %qr_code.id, menu_id = %menu.id, "QR code created");

    Ok((StatusCode::CREATED, Json(qr_code.into())))
}

/// GET /api/v1/menus/:menu_id/qr-codes
pub async fn list_qr_codes(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<ListQrCodesResponse>, ApiError> {
    let menu = owned_menu(&state, menu_id, user.user_id).await?;

    let repo = QrCodeRepository::new(state.pool.clone());
    let qr_codes: Vec<QrCodeResponse> = repo
        .find_by_menu(menu.id)
        .await?
        .into_iter()
        .map(|e| QrCode::from(e).into())
        .collect();

    let total = qr_codes.len();
    Ok(Json(ListQrCodesResponse { qr_codes, total }))
}

/// GET /api/v1/qr-codes/:qr_code_id
pub async fn get_qr_code(
    State(state): State<AppState>,
    user: UserAuth,
    Path(qr_code_id): Path<Uuid>,
) -> Result<Json<QrCodeResponse>, ApiError> {
    let qr_code = owned_qr_code(&state, qr_code_id, user.user_id).await?;
    Ok(Json(qr_code.into()))
}

/// Rename a code and/or replace its design. The target URL and code value
/// never change, so printed codes keep working.
///
/// PATCH /api/v1/qr-codes/:qr_code_id
pub async fn update_qr_code(
    State(state): State<AppState>,
    user: UserAuth,
    Path(qr_code_id): Path<Uuid>,
    Json(request): Json<UpdateQrCodeRequest>,
) -> Result<Json<QrCodeResponse>, ApiError> {
    request.validate()?;
    if let Some(design) = &request.design {
        design.validate()?;
    }

    let qr_code = owned_qr_code(&state, qr_code_id, user.user_id).await?;
    if let Some(design) = &request.design {
        QrMatrix::for_design(&qr_code.target_url, design)?;
    }

    let repo = QrCodeRepository::new(state.pool.clone());
    let entity = repo
        .update(
            qr_code.id,
            request.name.as_deref().map(str::trim),
            request.design.as_ref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("QR code not found".to_string()))?;

    info!(
        qr_code_id = %qr_code_id,
        design_changed = request.design.is_some(),
        "QR code updated"
    );
    Ok(Json(QrCode::from(entity).into()))
}

/// DELETE /api/v1/qr-codes/:qr_code_id
pub async fn delete_qr_code(
    State(state): State<AppState>,
    user: UserAuth,
    Path(qr_code_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let qr_code = owned_qr_code(&state, qr_code_id, user.user_id).await?;

    let repo = QrCodeRepository::new(state.pool.clone());
    if repo.delete(qr_code.id).await? == 0 {
        return Err(ApiError::NotFound("QR code not found".to_string()));
    }

    info!(qr_code_id = %qr_code_id, menu_id = %qr_code.menu_id, "QR code deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Download one code as PNG, SVG or a single-page PDF.
///
/// GET /api/v1/qr-codes/:qr_code_id/export?format=png|svg|pdf&size=
pub async fn export_qr_code(
    State(state): State<AppState>,
    user: UserAuth,
    Path(qr_code_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = query.format;
    let size = check_png_size(query.size.unwrap_or(state.config.qr.default_png_size))?;

    let qr_code = owned_qr_code(&state, qr_code_id, user.user_id).await?;
    let file_name = format!(
        "{}.{}",
        sanitize_file_name(&qr_code.name),
        format.extension()
    );

    let body = tokio::task::spawn_blocking(move || {
        let matrix = QrMatrix::for_design(&qr_code.target_url, &qr_code.design)?;
        match format {
            ExportFormat::Png => render_png(&matrix, &qr_code.design, size),
            ExportFormat::Svg => render_svg(&matrix, &qr_code.design).map(String::into_bytes),
            ExportFormat::Pdf => render_single(&qr_code.name, &matrix, &qr_code.design),
        }
    })
    .await??;

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response())
}

/// Generate `count` sequentially named codes and download them as a ZIP.
///
/// Rows are inserted in one transaction that commits only after the
/// archive is built, so a packaging failure leaves nothing behind. The
/// menu row stays locked for the whole transaction, which serialises
/// concurrent batches against the per-menu limit.
///
/// POST /api/v1/menus/:menu_id/qr-codes/batch
pub async fn generate_batch(
    State(state): State<AppState>,
    user: UserAuth,
    Path(menu_id): Path<Uuid>,
    Json(request): Json<BatchQrRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let max_batch = state.config.limits.max_batch_size;
    if request.count > max_batch {
        return Err(ApiError::Validation(format!(
            "count must be at most {}",
            max_batch
        )));
    }
    let size = check_png_size(request.size.unwrap_or(state.config.qr.default_png_size))?;

    let menu = owned_menu(&state, menu_id, user.user_id).await?;
    let limit = state.config.limits.max_qr_codes_per_menu;
    let additional = request.count as i64;
    // Unlocked pre-check so an over-limit batch is refused before rendering
    let existing = QrCodeRepository::new(state.pool.clone()).count_by_menu(menu.id).await?;
    ensure_capacity(limit, existing, additional)?;

    let planned = plan_batch(
        &state.config.server.public_base_url,
        menu.id,
        &request.name_prefix,
        request.start_index,
        request.count,
    );
    let design = Arc::new(request.design);
    let batch = render_batch(planned, Arc::clone(&design), size, state.config.qr.render_chunk_size).await?;

    let new_codes: Vec<NewQrCode> = batch
        .rendered
        .iter()
        .map(|r| NewQrCode {
            name: r.planned.name.clone(),
            code: r.planned.code.clone(),
            target_url: r.planned.target_url.clone(),
        })
        .collect();

    let mut tx = state.pool.begin().await?;
    let existing = QrCodeRepository::lock_menu_and_count(&mut tx, menu.id).await?;
    ensure_capacity(limit, existing, new_codes.len() as i64)?;
    QrCodeRepository::insert_batch(&mut tx, menu.id, menu.restaurant_id, &new_codes, &design).await?;

    let created = batch.rendered.len();
    let skipped = batch.skipped;
    let include_pdf = request.include_pdf;
    let archive =
        tokio::task::spawn_blocking(move || build_archive(&batch.rendered, &design, include_pdf))
            .await??;

    tx.commit().await?;

    record_qr_codes_generated("batch", created);
    record_qr_renders_skipped(skipped);
    info!(
        menu_id = %menu.id,
        created,
        skipped,
        include_pdf,
        archive_bytes = archive.len(),
        "QR batch generated"
    );

    let file_name = format!("{}-qr-codes.zip", sanitize_file_name(&request.name_prefix));
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
            (HeaderName::from_static(BATCH_CREATED_HEADER), created.to_string()),
            (HeaderName::from_static(BATCH_SKIPPED_HEADER), skipped.to_string()),
        ],
        archive,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_capacity_allows_filling_to_limit() {
        assert!(ensure_capacity(30, 25, 5).is_ok());
        assert!(ensure_capacity(30, 0, 0).is_ok());
    }

    #[test]
    fn test_ensure_capacity_rejects_overflow() {
        let err = ensure_capacity(30, 26, 5).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(msg) if msg.contains("(30)")));
    }
}
