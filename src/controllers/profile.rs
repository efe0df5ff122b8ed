// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile screen: greeting, photo, username, streak and vitals history.

use crate::controllers::{ActionStatus, ScreenScope, ScreenState};
use crate::db::{DocumentStore, HealthData};
use crate::error::{AppError, Notice};
use crate::metrics::{streak, weight_trend, TrendPoint};
use crate::models::{Session, UserProfile, VitalsRecord};
use crate::services::BlobStore;
use crate::time_utils::Clock;
use std::sync::Arc;

const ERROR_TITLE: &str = "Error";

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    /// Profile as last loaded or saved
    pub profile: UserProfile,
    /// Username text field
    pub username_input: String,
    /// Vitals, newest first
    pub history: Arc<Vec<VitalsRecord>>,
    pub streak: u32,
    pub trend: Vec<TrendPoint>,
    pub load: ActionStatus,
    pub save: ActionStatus,
    pub upload: ActionStatus,
    pub notice: Option<Notice>,
}

pub struct ProfileController<S: DocumentStore, B: BlobStore> {
    session: Session,
    data: Arc<HealthData<S>>,
    blobs: Arc<B>,
    scope: ScreenScope,
    clock: Clock,
    state: ScreenState<ProfileState>,
}

impl<S: DocumentStore, B: BlobStore> ProfileController<S, B> {
    pub fn new(
        session: Session,
        data: Arc<HealthData<S>>,
        blobs: Arc<B>,
        scope: ScreenScope,
        clock: Clock,
    ) -> Self {
        Self {
            session,
            data,
            blobs,
            scope,
            clock,
            state: ScreenState::default(),
        }
    }

    pub fn state(&self) -> ProfileState {
        self.state.snapshot()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.state.lock().notice.take()
    }

    pub fn set_username_input(&self, username: &str) {
        self.state.lock().username_input = username.to_string();
    }

    /// `"Hi, {username}!"`, or `"Hi, User!"` before a username is saved.
    pub fn greeting(&self) -> String {
        let state = self.state.lock();
        let name = match state.profile.username.as_str() {
            "" => "User",
            name => name,
        };
        format!("Hi, {}!", name)
    }

    pub fn streak_label(&self) -> String {
        format!("{}-day streak", self.state.lock().streak)
    }

    /// History entries as display lines, newest first.
    pub fn history_lines(&self) -> Vec<String> {
        let history = self.state.lock().history.clone();
        let tz = self.clock.now().timezone();
        history.iter().map(|r| r.history_line(&tz)).collect()
    }

    /// Fetch the profile and vitals history, then derive streak and trend.
    ///
    /// Returns `None` if the screen closed before the data arrived.
    pub async fn load(&self) -> Option<ActionStatus> {
        self.state.lock().load = ActionStatus::Loading;

        let Some(result) = self
            .scope
            .run(async { futures_util::try_join!(self.data.profile(), self.data.vitals()) })
            .await
        else {
            return self.state.abandon(|s| &mut s.load);
        };

        let mut state = self.state.lock();
        let status = match result {
            Ok((profile, history)) => {
                let now = self.clock.now();
                let profile = profile.unwrap_or_default();

                state.streak = streak(&history, &now);
                state.trend = weight_trend(&history, &now.timezone());
                state.username_input = profile.username.clone();
                state.profile = profile;
                tracing::debug!(
                    uid = %self.session.uid,
                    records = history.len(),
                    streak = state.streak,
                    "Profile loaded"
                );
                state.history = history;
                ActionStatus::Ready
            }
            Err(e) => fail(&mut state, e),
        };
        state.load = status.clone();
        Some(status)
    }

    /// Save the username field (trimmed), keeping the current photo.
    pub async fn save_username(&self) -> Option<ActionStatus> {
        let profile = {
            let mut state = self.state.lock();
            let username = state.username_input.trim().to_string();
            if username.is_empty() {
                let notice = Notice::new("Invalid Username", "Username cannot be empty.");
                state.save = ActionStatus::Failed(notice.clone());
                state.notice = Some(notice);
                return Some(state.save.clone());
            }
            state.save = ActionStatus::Loading;
            UserProfile {
                username,
                photo_url: state.profile.photo_url.clone(),
            }
        };

        let data = self.data.clone();
        let stored = profile.clone();
        let Some(result) = self
            .scope
            .commit(async move { data.save_profile(&stored).await })
            .await
        else {
            return self.state.abandon(|s| &mut s.save);
        };

        let mut state = self.state.lock();
        let status = match result {
            Ok(()) => {
                state.profile.username = profile.username;
                state.notice = Some(Notice::new("Saved", "Username updated."));
                ActionStatus::Ready
            }
            Err(e) => fail(&mut state, e),
        };
        state.save = status.clone();
        Some(status)
    }

    /// Upload a new profile picture and record its URL.
    ///
    /// Upload and profile update finish even if the screen closes first.
    ///
    /// The stored username is the pending edit if there is one, otherwise the
    /// saved username.
    pub async fn upload_photo(&self, image: Vec<u8>, content_type: &str) -> Option<ActionStatus> {
        let username = {
            let mut state = self.state.lock();
            state.upload = ActionStatus::Loading;
            match state.username_input.as_str() {
                "" => state.profile.username.clone(),
                pending => pending.to_string(),
            }
        };

        let path = format!("profile_pics/{}", self.session.uid);
        let content_type = content_type.to_string();
        let blobs = self.blobs.clone();
        let data = self.data.clone();
        let Some(result) = self
            .scope
            .commit(async move {
                let handle = blobs.upload(&path, image, &content_type).await?;
                let photo_url = blobs.url(&handle)?;
                let profile = UserProfile {
                    username,
                    photo_url,
                };
                data.save_profile(&profile).await?;
                Ok::<_, AppError>(profile.photo_url)
            })
            .await
        else {
            return self.state.abandon(|s| &mut s.upload);
        };

        let mut state = self.state.lock();
        let status = match result {
            Ok(photo_url) => {
                state.profile.photo_url = photo_url;
                ActionStatus::Ready
            }
            Err(e) => fail(&mut state, e),
        };
        state.upload = status.clone();
        Some(status)
    }
}

fn fail(state: &mut ProfileState, err: AppError) -> ActionStatus {
    let notice = err.notice(ERROR_TITLE);
    state.notice = Some(notice.clone());
    ActionStatus::Failed(notice)
}
