//! Windowed rendering state for the agent session timeline.
//!
//! Nothing here touches a real UI toolkit: the host supplies a
//! [`scroll::ScrollContainer`] and re-renders the slice returned by
//! [`viewport::Viewport::visible_slice`].

pub mod bus;
pub mod follow;
pub mod scroll;
pub mod viewport;
pub mod window;

pub use bus::{EventBus, SubscriptionId, TimelineEvent};
pub use follow::{FollowState, ScrollPin};
pub use scroll::{ContainerId, ScrollContainer, ScrollError, ScrollGeometry};
pub use viewport::{
    AutoScroll, LoadCompletion, LoadOlder, LoadRejection, LoadState, LoadTicket, ScrollOutcome,
    Viewport, ViewportConfig,
};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
