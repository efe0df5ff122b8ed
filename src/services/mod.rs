// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote collaborators behind trait seams.

pub mod identity;
pub mod nutrition;
pub mod storage;
pub mod vision;

pub use identity::{IdentityClient, IdentityProvider};
pub use nutrition::{FoodSearch, UsdaClient};
pub use storage::{BlobHandle, BlobStore, StorageClient};
pub use vision::{extract_text, AnnotateResponse, FeatureMode, TextAnnotator, VisionClient};
