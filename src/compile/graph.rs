use crate::compile::stage::{Stage, Timeline};

/// Composition tree of compiled timelines.
///
/// Leaves own a timeline; inner nodes arrange their children one after
/// another or side by side. [`StageGraph::flatten`] lowers the tree into a
/// single timeline the scheduler can play.
#[derive(Clone, Debug)]
pub enum StageGraph {
    /// A compiled timeline.
    Leaf(Timeline),
    /// Children played back to back.
    Sequence(Vec<StageGraph>),
    /// Children played together, all starting at offset 0.
    Concurrent(Vec<StageGraph>),
}

impl From<Timeline> for StageGraph {
    fn from(t: Timeline) -> Self {
        Self::Leaf(t)
    }
}

impl StageGraph {
    /// Offset at which the last stage of the graph ends.
    pub fn length_ms(&self) -> u64 {
        match self {
            Self::Leaf(t) => t.length_ms(),
            Self::Sequence(children) => children
                .iter()
                .fold(0u64, |acc, c| acc.saturating_add(c.length_ms())),
            Self::Concurrent(children) => {
                children.iter().map(Self::length_ms).max().unwrap_or(0)
            }
        }
    }

    /// Lower the graph into one sorted timeline.
    pub fn flatten(&self) -> Timeline {
        let mut out = Vec::new();
        self.collect_into(0, &mut out);
        Timeline::from_stages(out)
    }

    fn collect_into(&self, offset: u64, out: &mut Vec<Stage>) {
        match self {
            Self::Leaf(t) => out.extend(t.stages().iter().map(|s| {
                let mut s = s.clone();
                s.start_ms = s.start_ms.saturating_add(offset);
                s
            })),
            Self::Sequence(children) => {
                let mut at = offset;
                for child in children {
                    child.collect_into(at, out);
                    at = at.saturating_add(child.length_ms());
                }
            }
            Self::Concurrent(children) => {
                for child in children {
                    child.collect_into(offset, out);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/graph.rs"]
mod tests;
