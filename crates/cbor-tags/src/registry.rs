//! Tag number to handler mapping and the two-phase dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use ciborium::value::Value as CborValue;
use tracing::{debug, trace};

use crate::error::{RegistryError, ValidationError};
use crate::handler::TagHandler;
use crate::options::{DispatchOptions, UnknownTagPolicy};
use crate::tags;
use crate::value::Shape;

/// Map of tag number -> handler.
pub type HandlerMap = HashMap<u64, Arc<dyn TagHandler>>;

/// Registered tag handlers. Built once at startup, read-only afterwards.
#[derive(Clone, Default)]
pub struct TagRegistry {
    handlers: HandlerMap,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every handler in [`crate::tags`].
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for handler in tags::standard_handlers() {
            // Standard tags are distinct, so this cannot collide.
            let _ = registry.register_arc(handler);
        }
        registry
    }

    pub fn register<H: TagHandler + 'static>(&mut self, handler: H) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(handler))
    }

    pub fn register_arc(&mut self, handler: Arc<dyn TagHandler>) -> Result<(), RegistryError> {
        let tag = handler.tag();
        if self.handlers.contains_key(&tag) {
            return Err(RegistryError::AlreadyRegistered(tag));
        }
        self.handlers.insert(tag, handler);
        Ok(())
    }

    /// Replaces any handler registered for the same tag, returning it.
    pub fn replace(&mut self, handler: Arc<dyn TagHandler>) -> Option<Arc<dyn TagHandler>> {
        self.handlers.insert(handler.tag(), handler)
    }

    pub fn lookup(&self, tag: u64) -> Option<&Arc<dyn TagHandler>> {
        self.handlers.get(&tag)
    }

    pub fn contains(&self, tag: u64) -> bool {
        self.handlers.contains_key(&tag)
    }

    /// Registered tag numbers in ascending order.
    pub fn tags(&self) -> Vec<u64> {
        let mut tags: Vec<u64> = self.handlers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// [`TagRegistry::dispatch_with`] using default options (unknown tags pass
    /// through untagged).
    pub fn dispatch(&self, tag: u64, value: CborValue) -> Result<CborValue, ValidationError> {
        self.dispatch_with(tag, value, &DispatchOptions::default())
    }

    /// Validates `value` as the content of tag `tag`.
    ///
    /// The handler's type filter is checked first; `validate` only runs on
    /// content whose shape fits.
    pub fn dispatch_with(
        &self,
        tag: u64,
        value: CborValue,
        opts: &DispatchOptions,
    ) -> Result<CborValue, ValidationError> {
        let Some(handler) = self.lookup(tag) else {
            debug!(tag, "no handler registered");
            return match opts.unknown_tags {
                UnknownTagPolicy::PassThrough => Ok(value),
                UnknownTagPolicy::Reject => Err(ValidationError::UnknownTag { tag }),
            };
        };
        trace!(tag, "dispatching tagged value");
        let filter = handler.type_filter();
        if !filter.matches(&value) {
            let found = Shape::of(&value);
            debug!(tag, %found, expected = %filter, "shape mismatch");
            return Err(ValidationError::ShapeMismatch {
                tag,
                expected: filter.to_string(),
                found,
            });
        }
        handler.validate(value).inspect_err(|err| {
            debug!(tag, error = %err, "semantic validation failed");
        })
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Process-wide standard registry, built on first use.
pub fn default_registry() -> &'static TagRegistry {
    static REGISTRY: OnceLock<TagRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TagRegistry::standard)
}
