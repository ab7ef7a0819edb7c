pub mod bbox;
pub mod errors;
pub mod extract;
pub mod render;
pub mod series;
pub mod session;
pub mod surface;
pub mod table;

pub use bbox::BoundingBox;
pub use errors::{PathviewError, Result};
pub use extract::{Modality, SessionSeries, SessionVariable};
pub use render::{draw_path, PathStyle};
pub use series::{IndicatorSeries, VectorSeries};
pub use session::{load_sessions, Session, SessionCollection};
pub use surface::{Axis, Bounds, ScatterHandle, Surface, SurfaceKind};
pub use table::SessionTable;
