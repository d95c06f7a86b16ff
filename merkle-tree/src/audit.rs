//! Hooks for observing a tree build. Nothing is printed unless the caller asks
//! for it, so builds stay quiet in tests and libraries.

use log::debug;

/// Steps of a build, in the order they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEvent<'a> {
    /// A claim was encoded and hashed into a leaf. `index` is its input position.
    LeafEncoded {
        index: usize,
        encoded: &'a [u8],
        leaf: &'a [u8; 32],
    },
    /// All nodes at `height` are known. Height 0 is the leaf level.
    LevelBuilt {
        height: usize,
        nodes: &'a [[u8; 32]],
    },
    /// The last node of an odd-sized level moved up to `height` unchanged.
    OddNodePromoted { height: usize, node: &'a [u8; 32] },
    RootComputed {
        root: &'a [u8; 32],
        leaf_count: usize,
    },
}

pub trait AuditLog {
    fn record(&mut self, event: AuditEvent<'_>);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudit;

impl AuditLog for NoopAudit {
    fn record(&mut self, _event: AuditEvent<'_>) {}
}

/// Writes every event to the `debug` log level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudit;

impl AuditLog for LogAudit {
    fn record(&mut self, event: AuditEvent<'_>) {
        match event {
            AuditEvent::LeafEncoded {
                index,
                encoded,
                leaf,
            } => debug!(
                "leaf {index}: 0x{} -> 0x{}",
                hex::encode(encoded),
                hex::encode(leaf)
            ),
            AuditEvent::LevelBuilt { height, nodes } => {
                debug!("level {height}: {} nodes", nodes.len());
                for node in nodes {
                    debug!("  0x{}", hex::encode(node));
                }
            }
            AuditEvent::OddNodePromoted { height, node } => {
                debug!("promoted 0x{} to level {height}", hex::encode(node))
            }
            AuditEvent::RootComputed { root, leaf_count } => {
                debug!("root 0x{} over {leaf_count} leaves", hex::encode(root))
            }
        }
    }
}

impl<F> AuditLog for F
where
    F: FnMut(AuditEvent<'_>),
{
    fn record(&mut self, event: AuditEvent<'_>) {
        (self)(event)
    }
}
