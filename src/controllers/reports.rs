// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Medical report screen: pick an image, recognize its text, store both.

use crate::controllers::{ActionStatus, ScreenScope, ScreenState};
use crate::db::{DocumentStore, HealthData};
use crate::error::{AppError, Notice};
use crate::models::{MedicalReport, Session};
use crate::services::{extract_text, BlobStore, TextAnnotator};
use crate::time_utils::Clock;
use std::sync::Arc;

const OCR_ERROR_TITLE: &str = "OCR Error";

/// Image picked for scanning.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub bytes: Arc<Vec<u8>>,
    pub content_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReportsState {
    pub image: Option<SelectedImage>,
    /// Text recognized by the last successful scan
    pub extracted_text: String,
    pub ocr: ActionStatus,
    pub notice: Option<Notice>,
}

pub struct ReportsController<S: DocumentStore, B: BlobStore, A: TextAnnotator> {
    session: Session,
    data: Arc<HealthData<S>>,
    blobs: Arc<B>,
    annotator: Arc<A>,
    scope: ScreenScope,
    clock: Clock,
    state: ScreenState<ReportsState>,
}

impl<S: DocumentStore, B: BlobStore, A: TextAnnotator> ReportsController<S, B, A> {
    pub fn new(
        session: Session,
        data: Arc<HealthData<S>>,
        blobs: Arc<B>,
        annotator: Arc<A>,
        scope: ScreenScope,
        clock: Clock,
    ) -> Self {
        Self {
            session,
            data,
            blobs,
            annotator,
            scope,
            clock,
            state: ScreenState::default(),
        }
    }

    pub fn state(&self) -> ReportsState {
        self.state.snapshot()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.state.lock().notice.take()
    }

    pub fn select_image(&self, bytes: Vec<u8>, content_type: &str) {
        self.state.lock().image = Some(SelectedImage {
            bytes: Arc::new(bytes),
            content_type: content_type.to_string(),
        });
    }

    /// Recognize the selected image's text, then upload the image and store
    /// the report.
    pub async fn run_ocr(&self) -> Option<ActionStatus> {
        let image = {
            let mut state = self.state.lock();
            let Some(image) = state.image.clone() else {
                state.notice = Some(Notice::title_only("Select an image first"));
                return Some(state.ocr.clone());
            };
            state.ocr = ActionStatus::Loading;
            image
        };

        let Some(extracted) = self
            .scope
            .run(extract_text(self.annotator.as_ref(), &image.bytes))
            .await
        else {
            return self.state.abandon(|s| &mut s.ocr);
        };
        let text = match extracted {
            Ok(text) => text,
            Err(AppError::NoTextFound) => {
                let mut state = self.state.lock();
                let notice = Notice::new("No text found", "Try a clearer image or a PDF.");
                state.extracted_text.clear();
                state.notice = Some(notice.clone());
                state.ocr = ActionStatus::Failed(notice);
                return Some(state.ocr.clone());
            }
            Err(e) => return Some(self.fail(e)),
        };

        self.state.lock().extracted_text = text.clone();

        // From here on the report is stored even if the screen closes.
        let now = self.clock.now_utc();
        let uid = self.session.uid.clone();
        let blobs = self.blobs.clone();
        let data = self.data.clone();
        let Some(result) = self
            .scope
            .commit(async move {
                let path = format!("medical_reports/{}_{}", uid, now.timestamp_millis());
                let handle = blobs
                    .upload(&path, image.bytes.as_ref().clone(), &image.content_type)
                    .await?;
                let image_url = blobs.url(&handle)?;

                data.add_report(MedicalReport {
                    uid,
                    timestamp: now,
                    image_url,
                    extracted_text: text,
                })
                .await
            })
            .await
        else {
            return self.state.abandon(|s| &mut s.ocr);
        };

        match result {
            Ok(id) => {
                tracing::info!(uid = %self.session.uid, id = %id, "Report scanned");
                let mut state = self.state.lock();
                state.notice = Some(Notice::new("Saved", "Report + OCR text stored"));
                state.ocr = ActionStatus::Ready;
                Some(ActionStatus::Ready)
            }
            Err(e) => Some(self.fail(e)),
        }
    }

    fn fail(&self, err: AppError) -> ActionStatus {
        let notice = err.notice(OCR_ERROR_TITLE);
        let mut state = self.state.lock();
        state.notice = Some(notice.clone());
        state.ocr = ActionStatus::Failed(notice);
        state.ocr.clone()
    }
}
