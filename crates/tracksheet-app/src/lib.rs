// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod feed;
pub mod ids;
pub mod layout;
pub mod model;
pub mod view;

pub use feed::*;
pub use ids::*;
pub use layout::*;
pub use model::*;
pub use view::*;
