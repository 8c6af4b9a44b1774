//! Testing utilities and harness for the incremental list view

mod clock;
mod dialogs;
mod surface;
mod test_rule;

pub use clock::{VirtualClock, FRAME_INTERVAL};
pub use dialogs::FakeNativeDialogModule;
pub use surface::{RecordingScrollResponder, RecordingScrollSurface, ScrollToCall};
pub use test_rule::{ListViewTestRule, UniformLayout, MAX_SETTLE_FRAMES};

pub mod prelude {
    pub use crate::{
        FakeNativeDialogModule, ListViewTestRule, RecordingScrollSurface, UniformLayout,
        VirtualClock,
    };
}
