//! Props linking for consumers that bind nodes to a presentation layer.
//!
//! A consumer receives [`Props`] carrying the node it renders and an opaque
//! theme. [`Store::link`] derives the props for a child node, and
//! [`Store::read`] reads one property of the linked node.

use crate::{
    Result,
    entity::Entity,
    path::Part,
    store::Store,
    value::Value,
};

/// The node a consumer is bound to, plus an opaque theme.
///
/// The theme is never inspected by the store; it is only carried along or
/// replaced when linking.
#[derive(Debug, Clone)]
pub struct Props<T> {
    pub state: Entity,
    pub theme: Option<T>,
}

impl<T> Props<T> {
    pub fn new(state: Entity) -> Self {
        Props { state, theme: None }
    }

    pub fn with_theme(state: Entity, theme: T) -> Self {
        Props {
            state,
            theme: Some(theme),
        }
    }
}

impl Store {
    /// Derives the props for the node at `part` below `props.state`.
    ///
    /// The node is created if needed. The theme is replaced by
    /// `theme_override` when one is given and carried over otherwise.
    pub fn link<T: Clone>(
        props: &Props<T>,
        part: impl Into<Part>,
        theme_override: Option<T>,
    ) -> Result<Props<T>> {
        Ok(Props {
            state: props.state.select(part)?,
            theme: theme_override.or_else(|| props.theme.clone()),
        })
    }

    /// Reads `key` from the node the props are bound to.
    pub fn read<T>(props: &Props<T>, key: &str) -> Option<Value> {
        props.state.get(key).cloned()
    }
}
