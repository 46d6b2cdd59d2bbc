// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod auth;
pub mod batch;
pub mod confirm;
pub mod filters;
pub mod forms;
pub mod ids;
pub mod list;
pub mod model;
pub mod paging;
pub mod refine;
pub mod selection;
pub mod state;

pub use auth::*;
pub use batch::*;
pub use confirm::*;
pub use filters::*;
pub use forms::*;
pub use ids::*;
pub use list::*;
pub use model::*;
pub use paging::*;
pub use refine::*;
pub use selection::*;
pub use state::*;
