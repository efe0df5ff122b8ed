// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application shell: session gate and screen stack.
//!
//! Signed out, the only screen is Login. Signing in connects the
//! session-bound clients and mounts Profile; other screens are pushed on top
//! of it. Every mounted screen gets its own [`ScreenScope`], closed when the
//! screen is popped or the user signs out.

use crate::config::Config;
use crate::controllers::{
    ActionStatus, CalorieController, LoginController, ProfileController, ReportsController,
    ScreenScope, VitalsController,
};
use crate::db::{DocumentStore, FirestoreDb, HealthData};
use crate::error::Result;
use crate::models::Session;
use crate::services::{
    BlobStore, FoodSearch, IdentityClient, IdentityProvider, StorageClient, TextAnnotator,
    UsdaClient, VisionClient,
};
use crate::time_utils::Clock;
use std::future::Future;
use std::sync::Arc;

/// Screens reachable after sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Profile,
    EnterVitals,
    Calories,
    ScanReport,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Profile,
        Route::EnterVitals,
        Route::Calories,
        Route::ScanReport,
    ];

    /// Screen title, also its navigation name.
    pub fn title(self) -> &'static str {
        match self {
            Route::Profile => "Profile",
            Route::EnterVitals => "Enter Vitals",
            Route::Calories => "Calories",
            Route::ScanReport => "Scan Report",
        }
    }
}

/// Clients bound to one signed-in session.
pub struct SessionClients<S, B> {
    pub store: Arc<S>,
    pub blobs: Arc<B>,
}

/// The set of remote collaborators the app runs against.
pub trait Backend: Send + Sync + 'static {
    type Identity: IdentityProvider;
    type Store: DocumentStore;
    type Blobs: BlobStore;
    type Foods: FoodSearch;
    type Annotator: TextAnnotator;

    fn identity(&self) -> Arc<Self::Identity>;
    fn foods(&self) -> Arc<Self::Foods>;
    fn annotator(&self) -> Arc<Self::Annotator>;

    /// Connect the clients that act as the signed-in user.
    fn connect(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<SessionClients<Self::Store, Self::Blobs>>> + Send;
}

/// Production backend: Firebase, USDA and Cloud Vision.
pub struct CloudBackend {
    config: Config,
    identity: Arc<IdentityClient>,
    foods: Arc<UsdaClient>,
    annotator: Arc<VisionClient>,
}

impl CloudBackend {
    pub fn new(config: Config) -> Self {
        Self {
            identity: Arc::new(IdentityClient::new(&config)),
            foods: Arc::new(UsdaClient::new(&config)),
            annotator: Arc::new(VisionClient::new(&config)),
            config,
        }
    }
}

impl Backend for CloudBackend {
    type Identity = IdentityClient;
    type Store = FirestoreDb;
    type Blobs = StorageClient;
    type Foods = UsdaClient;
    type Annotator = VisionClient;

    fn identity(&self) -> Arc<IdentityClient> {
        self.identity.clone()
    }

    fn foods(&self) -> Arc<UsdaClient> {
        self.foods.clone()
    }

    fn annotator(&self) -> Arc<VisionClient> {
        self.annotator.clone()
    }

    async fn connect(&self, session: &Session) -> Result<SessionClients<FirestoreDb, StorageClient>> {
        let store = FirestoreDb::connect(&self.config.firebase_project_id, session).await?;
        Ok(SessionClients {
            store: Arc::new(store),
            blobs: Arc::new(StorageClient::new(&self.config, session)),
        })
    }
}

/// A mounted screen's controller.
pub enum Screen<B: Backend> {
    Profile(Arc<ProfileController<B::Store, B::Blobs>>),
    Vitals(Arc<VitalsController<B::Store>>),
    Calories(Arc<CalorieController<B::Store, B::Foods>>),
    Reports(Arc<ReportsController<B::Store, B::Blobs, B::Annotator>>),
}

impl<B: Backend> Clone for Screen<B> {
    fn clone(&self) -> Self {
        match self {
            Screen::Profile(c) => Screen::Profile(c.clone()),
            Screen::Vitals(c) => Screen::Vitals(c.clone()),
            Screen::Calories(c) => Screen::Calories(c.clone()),
            Screen::Reports(c) => Screen::Reports(c.clone()),
        }
    }
}

struct Mounted<B: Backend> {
    route: Route,
    scope: ScreenScope,
    screen: Screen<B>,
}

struct SignedIn<B: Backend> {
    session: Session,
    data: Arc<HealthData<B::Store>>,
    blobs: Arc<B::Blobs>,
    scope: ScreenScope,
    stack: Vec<Mounted<B>>,
}

/// The application: login gate plus the signed-in screen stack.
pub struct App<B: Backend> {
    backend: B,
    clock: Clock,
    login: Arc<LoginController<B::Identity>>,
    login_scope: ScreenScope,
    signed_in: Option<SignedIn<B>>,
}

impl<B: Backend> App<B> {
    pub fn new(backend: B, clock: Clock) -> Self {
        let login_scope = ScreenScope::new();
        Self {
            login: Arc::new(LoginController::new(backend.identity(), login_scope.clone())),
            login_scope,
            backend,
            clock,
            signed_in: None,
        }
    }

    /// Resume a session the identity provider still holds, if any.
    pub async fn start(&mut self) -> Result<bool> {
        match self.backend.identity().current_session() {
            Some(session) => {
                self.enter(session).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.signed_in.as_ref().map(|s| &s.session)
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in.is_some()
    }

    /// The login screen, shown while signed out.
    pub fn login(&self) -> Option<Arc<LoginController<B::Identity>>> {
        match self.signed_in {
            None => Some(self.login.clone()),
            Some(_) => None,
        }
    }

    /// Submit the login form; on success the signed-in screens are mounted.
    pub async fn submit_login(&mut self) -> Result<bool> {
        if self.signed_in.is_some() {
            return Ok(true);
        }
        let Some(session) = self.login.submit().await else {
            return Ok(false);
        };
        self.enter(session).await?;
        Ok(true)
    }

    async fn enter(&mut self, session: Session) -> Result<()> {
        let clients = self.backend.connect(&session).await?;
        self.login_scope.close();

        tracing::info!(uid = %session.uid, "Session started");
        self.signed_in = Some(SignedIn {
            data: Arc::new(HealthData::new(clients.store, &session)),
            blobs: clients.blobs,
            scope: ScreenScope::new(),
            stack: Vec::new(),
            session,
        });
        self.navigate(Route::Profile);
        Ok(())
    }

    /// Route on top of the stack; `None` while signed out.
    pub fn current_route(&self) -> Option<Route> {
        self.signed_in
            .as_ref()
            .and_then(|s| s.stack.last())
            .map(|m| m.route)
    }

    /// Routes from the bottom of the stack up.
    pub fn routes(&self) -> Vec<Route> {
        self.signed_in
            .as_ref()
            .map(|s| s.stack.iter().map(|m| m.route).collect())
            .unwrap_or_default()
    }

    /// Controller of the top screen.
    pub fn screen(&self) -> Option<Screen<B>> {
        self.signed_in
            .as_ref()
            .and_then(|s| s.stack.last())
            .map(|m| m.screen.clone())
    }

    /// Session-scoped data, for hosts that need to force a refetch.
    pub fn data(&self) -> Option<Arc<HealthData<B::Store>>> {
        self.signed_in.as_ref().map(|s| s.data.clone())
    }

    /// Push a screen. Does nothing while signed out.
    pub fn navigate(&mut self, route: Route) -> Option<Screen<B>> {
        let signed_in = self.signed_in.as_mut()?;
        let scope = signed_in.scope.child();
        let session = signed_in.session.clone();
        let data = signed_in.data.clone();
        let clock = self.clock;

        let screen = match route {
            Route::Profile => Screen::Profile(Arc::new(ProfileController::new(
                session,
                data,
                signed_in.blobs.clone(),
                scope.clone(),
                clock,
            ))),
            Route::EnterVitals => Screen::Vitals(Arc::new(VitalsController::new(
                session,
                data,
                scope.clone(),
                clock,
            ))),
            Route::Calories => Screen::Calories(Arc::new(CalorieController::new(
                session,
                data,
                self.backend.foods(),
                scope.clone(),
                clock,
            ))),
            Route::ScanReport => Screen::Reports(Arc::new(ReportsController::new(
                session,
                data,
                signed_in.blobs.clone(),
                self.backend.annotator(),
                scope.clone(),
                clock,
            ))),
        };

        tracing::debug!(route = route.title(), depth = signed_in.stack.len() + 1, "Screen mounted");
        signed_in.stack.push(Mounted {
            route,
            scope,
            screen: screen.clone(),
        });
        Some(screen)
    }

    /// Pop the top screen, abandoning its in-flight actions.
    ///
    /// The initial screen is never popped; returns whether a screen was removed.
    pub fn go_back(&mut self) -> bool {
        let Some(signed_in) = self.signed_in.as_mut() else {
            return false;
        };
        if signed_in.stack.len() <= 1 {
            return false;
        }
        if let Some(top) = signed_in.stack.pop() {
            top.scope.close();
            tracing::debug!(route = top.route.title(), "Screen closed");
        }
        true
    }

    /// Save the vitals form on top of the stack and return to the previous
    /// screen if it was stored.
    pub async fn save_vitals(&mut self) -> Option<ActionStatus> {
        let Some(Screen::Vitals(controller)) = self.screen() else {
            return None;
        };
        let status = controller.save().await?;
        if status.is_ready() {
            self.go_back();
        }
        Some(status)
    }

    /// Exchange the session's refresh token and reconnect.
    ///
    /// Cached data is dropped and open screens are remounted on the new
    /// clients.
    pub async fn refresh_session(&mut self) -> Result<()> {
        let Some(session) = self.session().cloned() else {
            return Ok(());
        };
        let refreshed = self.backend.identity().refresh(&session).await?;
        let routes = self.routes();

        self.close_session();
        self.enter(refreshed).await?;
        for route in routes.into_iter().skip(1) {
            self.navigate(route);
        }
        Ok(())
    }

    /// Sign out and return to the login screen.
    pub fn sign_out(&mut self) {
        self.backend.identity().sign_out();
        self.close_session();

        self.login_scope = ScreenScope::new();
        self.login = Arc::new(LoginController::new(
            self.backend.identity(),
            self.login_scope.clone(),
        ));
    }

    fn close_session(&mut self) {
        if let Some(signed_in) = self.signed_in.take() {
            signed_in.scope.close();
            signed_in.data.invalidate_all();
            tracing::info!(uid = %signed_in.session.uid, "Session closed");
        }
    }
}
