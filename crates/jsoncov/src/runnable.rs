//! Test objects as the host runner sees them
//!
//! A runner's test objects usually hold references back into the suite
//! tree, hooks and closures. The reporter only reads them through
//! [`Runnable`] and never serializes them directly.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Read access to a test owned by the host runner
pub trait Runnable {
    /// Test's own title
    fn title(&self) -> &str;

    /// Title prefixed by the titles of every ancestor suite
    fn full_title(&self) -> String;

    /// Time the test took, `None` if it never ran
    fn duration(&self) -> Option<Duration>;

    /// Retries spent before the recorded outcome
    fn current_retry(&self) -> u32;
}

macro_rules! forward_runnable {
    ($($ptr:ty),*) => {$(
        impl<R: Runnable + ?Sized> Runnable for $ptr {
            fn title(&self) -> &str {
                (**self).title()
            }

            fn full_title(&self) -> String {
                (**self).full_title()
            }

            fn duration(&self) -> Option<Duration> {
                (**self).duration()
            }

            fn current_retry(&self) -> u32 {
                (**self).current_retry()
            }
        }
    )*};
}

forward_runnable!(&R, Box<R>, Rc<R>, Arc<R>);

/// A suite in the runner's test tree
///
/// Suites link to their parent only, so a test can compute its full title
/// without the tree holding cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suite {
    title: String,
    parent: Option<Arc<Suite>>,
}

impl Suite {
    /// Create the untitled root suite
    #[must_use]
    pub fn root() -> Arc<Self> {
        Arc::new(Self {
            title: String::new(),
            parent: None,
        })
    }

    /// Create a suite nested under `self`
    #[must_use]
    pub fn child(self: &Arc<Self>, title: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            title: title.into(),
            parent: Some(Arc::clone(self)),
        })
    }

    /// Suite title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Check if this is a root suite
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Ancestor titles joined by a single space
    ///
    /// A parent with an empty full title (the root) contributes nothing, so
    /// a top-level suite `Math` has the full title `"Math"`.
    #[must_use]
    pub fn full_title(&self) -> String {
        match &self.parent {
            Some(parent) => {
                let parent_title = parent.full_title();
                if parent_title.is_empty() {
                    self.title.clone()
                } else {
                    format!("{parent_title} {}", self.title)
                }
            }
            None => self.title.clone(),
        }
    }
}

/// A test case owned by the runner
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    title: String,
    parent: Arc<Suite>,
    duration: Option<Duration>,
    current_retry: u32,
}

impl TestCase {
    /// Create a test that has not run yet
    #[must_use]
    pub fn new(parent: &Arc<Suite>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            parent: Arc::clone(parent),
            duration: None,
            current_retry: 0,
        }
    }

    /// Set how long the test took
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the retry count at the time of recording
    #[must_use]
    pub const fn with_retry(mut self, current_retry: u32) -> Self {
        self.current_retry = current_retry;
        self
    }

    /// Suite the test belongs to
    #[must_use]
    pub fn parent(&self) -> &Arc<Suite> {
        &self.parent
    }
}

impl Runnable for TestCase {
    fn title(&self) -> &str {
        &self.title
    }

    /// Parent suite's full title, a space, then the test title
    ///
    /// The separator is always written, so a test directly under the root
    /// suite has a leading space (`" adds"`).
    fn full_title(&self) -> String {
        format!("{} {}", self.parent.full_title(), self.title)
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn current_retry(&self) -> u32 {
        self.current_retry
    }
}
