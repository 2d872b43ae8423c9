//! Background bodies replayed ahead of the scenario body during discovery.

use derive_more::{Deref, From};

use crate::recorder::DiscoveryBody;

/// Supplies the ordered background bodies declared for a subject type.
///
/// Backgrounds are resolved once, ahead of execution, and replayed in order
/// before the scenario body during the discovery pass.
pub trait BackgroundSource<S: 'static> {
    /// Ordered background bodies for the subject type.
    fn backgrounds(&self) -> &[DiscoveryBody<S>];
}

/// Vec-backed [`BackgroundSource`].
///
/// # Examples
///
/// ```
/// use stepwise::{BackgroundList, BackgroundSource, sync_body, sync_discovery};
///
/// let mut backgrounds = BackgroundList::<Vec<u32>>::new();
/// backgrounds.push(sync_discovery(|_, recorder| {
///     recorder.declare("a seeded collection", sync_body(|_, _| Ok(())));
///     Ok(())
/// }));
/// assert_eq!(backgrounds.backgrounds().len(), 1);
/// ```
#[derive(Deref, From)]
pub struct BackgroundList<S: 'static>(Vec<DiscoveryBody<S>>);

impl<S: 'static> BackgroundList<S> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a background body, keeping declaration order.
    pub fn push(&mut self, body: DiscoveryBody<S>) {
        self.0.push(body);
    }
}

impl<S: 'static> Default for BackgroundList<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> BackgroundSource<S> for BackgroundList<S> {
    fn backgrounds(&self) -> &[DiscoveryBody<S>] {
        &self.0
    }
}
