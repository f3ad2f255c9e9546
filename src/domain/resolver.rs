//! Location resolution and container placement
//!
//! A container's location is free text. The resolver pulls a stack
//! identifier token out of it (a fixed prefix followed by digits and
//! optional alphanumeric suffix, e.g. `S5` in "Block A / Stack S5 / Tier 2")
//! and looks the token up in the layout by exact id. Resolution never fails
//! loudly: a missing or unknown token simply yields `None`.

use regex::Regex;

use crate::domain::container::ContainerRecord;
use crate::domain::core::Rect;
use crate::domain::layout::{StackRegion, YardLayout};

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("Location prefix '{0}' must be non-empty ASCII alphanumeric")]
    InvalidPrefix(String),

    #[error("Failed to build location pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Maps free-text locations onto layout stacks
#[derive(Debug, Clone)]
pub struct LocationResolver {
    prefix: String,
    pattern: Regex,
}

impl LocationResolver {
    pub const DEFAULT_PREFIX: &'static str = "S";

    pub fn new(prefix: &str) -> Result<Self, ResolverError> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ResolverError::InvalidPrefix(prefix.to_string()));
        }

        let pattern = Regex::new(&format!(
            r"\b({}[0-9]+[A-Za-z0-9]*)\b",
            regex::escape(prefix)
        ))?;

        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// First stack identifier token in the location text
    pub fn token<'a>(&self, location: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(location)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Resolves a location to its stack, or None when no token is present or
    /// the token names no stack in the layout
    pub fn resolve<'l>(&self, location: &str, layout: &'l YardLayout) -> Option<&'l StackRegion> {
        self.token(location).and_then(|token| layout.stack(token))
    }

    fn resolve_index(&self, location: &str, layout: &YardLayout) -> Option<usize> {
        self.token(location).and_then(|token| layout.index_of(token))
    }
}

/// Where one container is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerPlacement {
    /// Index into the caller's container slice
    pub container: usize,
    /// Index into the layout's stacks
    pub stack: usize,
    /// Slot inside the stack, in world space
    pub rect: Rect,
}

/// Container to stack assignment for one render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placements {
    items: Vec<ContainerPlacement>,
    unresolved: usize,
}

impl Placements {
    /// Inset between a stack's edge and its container slots
    pub const SLOT_INSET: f64 = 4.0;
    /// Gap between neighbouring slots in the same stack
    pub const SLOT_GAP: f64 = 2.0;

    /// Resolves every container and lays out the ones sharing a stack side by
    /// side, in input order
    pub fn compute(
        containers: &[ContainerRecord],
        layout: &YardLayout,
        resolver: &LocationResolver,
    ) -> Self {
        let resolved: Vec<Option<usize>> = containers
            .iter()
            .map(|container| resolver.resolve_index(&container.location, layout))
            .collect();

        let mut per_stack = vec![0usize; layout.stacks().len()];
        for stack in resolved.iter().flatten() {
            per_stack[*stack] += 1;
        }

        let mut next_slot = vec![0usize; layout.stacks().len()];
        let mut items = Vec::with_capacity(containers.len());
        let mut unresolved = 0;

        for (container, stack) in resolved.into_iter().enumerate() {
            let Some(stack) = stack else {
                log::trace!("container {} has no resolvable stack", containers[container].id);
                unresolved += 1;
                continue;
            };

            let rect = slot_rect(
                layout.stacks()[stack].rect,
                next_slot[stack],
                per_stack[stack],
            );
            next_slot[stack] += 1;
            items.push(ContainerPlacement {
                container,
                stack,
                rect,
            });
        }

        Self { items, unresolved }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerPlacement> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of containers left out because their location did not resolve
    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }

    /// First container placed in the given stack, in input order
    pub fn first_in_stack(&self, stack: usize) -> Option<&ContainerPlacement> {
        self.items.iter().find(|item| item.stack == stack)
    }

    pub fn in_stack(&self, stack: usize) -> impl Iterator<Item = &ContainerPlacement> {
        self.items.iter().filter(move |item| item.stack == stack)
    }

    pub fn for_container(&self, container: usize) -> Option<&ContainerPlacement> {
        self.items.iter().find(|item| item.container == container)
    }
}

fn slot_rect(stack: Rect, slot: usize, count: usize) -> Rect {
    let inner = stack.inflate(-Placements::SLOT_INSET);
    let count = count.max(1) as f64;
    let width = ((inner.w - Placements::SLOT_GAP * (count - 1.0)) / count).max(1.0);
    let x = inner.x + slot as f64 * (width + Placements::SLOT_GAP);
    Rect::new(x, inner.y, width, inner.h)
}
