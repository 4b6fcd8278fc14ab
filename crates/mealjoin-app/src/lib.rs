// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod action;
pub mod controller;
pub mod forms;
pub mod ids;
pub mod items;
pub mod model;
pub mod session;
pub mod state;
pub mod summary;
pub mod validation;
pub mod view;
pub mod worker;

pub use action::*;
pub use controller::*;
pub use forms::*;
pub use ids::*;
pub use items::*;
pub use model::*;
pub use session::*;
pub use state::*;
pub use summary::*;
pub use view::*;
pub use worker::*;
