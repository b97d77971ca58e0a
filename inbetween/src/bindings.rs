//! Explicit source -> target stroke correspondences.
//!
//! Groups are the stored form; connections are single edges used while
//! editing. Every edit explodes the groups, changes edges, and regroups by
//! connected component, so the stored form is always canonical.

use crate::model::StrokeId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Author-declared mapping between strokes of two keyframes.
///
/// Id multiplicity is meaningful: `sources: [s, s], targets: [a, b]` is a
/// split of `s` into `a` and `b`; the mirrored form is a merge. Groups with
/// several distinct ids on both sides are a lossy many-to-many fallback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrespondenceGroup {
    pub source_frame: u32,
    pub target_frame: u32,
    pub sources: Vec<StrokeId>,
    pub targets: Vec<StrokeId>,
}

impl CorrespondenceGroup {
    pub fn new(source_frame: u32, target_frame: u32, sources: Vec<StrokeId>, targets: Vec<StrokeId>) -> Self {
        Self { source_frame, target_frame, sources, targets }
    }
    pub fn unique_sources(&self) -> Vec<StrokeId> {
        unique(&self.sources)
    }
    pub fn unique_targets(&self) -> Vec<StrokeId> {
        unique(&self.targets)
    }
    pub fn is_pair(&self, source_frame: u32, target_frame: u32) -> bool {
        self.source_frame == source_frame && self.target_frame == target_frame
    }
}

/// One source -> target edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source_frame: u32,
    pub target_frame: u32,
    pub source: StrokeId,
    pub target: StrokeId,
}

impl Connection {
    fn same_pair(&self, source_frame: u32, target_frame: u32) -> bool {
        self.source_frame == source_frame && self.target_frame == target_frame
    }
}

/// What happens to edges already pointing at a target an edit claims.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Both edges stay; the next regroup yields a many-to-many group.
    #[default]
    Coexist,
    /// Conflicting edges are removed.
    Overwrite,
    /// Conflicting edges move to the target the edited edge vacated.
    Swap,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ConnectionEdit {
    /// Connect every id in `sources` to `target`.
    Connect {
        source_frame: u32,
        target_frame: u32,
        sources: Vec<StrokeId>,
        target: StrokeId,
        #[serde(default)]
        overwrite: bool,
    },
    /// Move the edge `source -> from` so it points at `to`.
    Retarget {
        source_frame: u32,
        target_frame: u32,
        source: StrokeId,
        from: StrokeId,
        to: StrokeId,
        #[serde(default)]
        policy: ConflictPolicy,
    },
    /// Remove every `source -> target` edge.
    Disconnect {
        source_frame: u32,
        target_frame: u32,
        source: StrokeId,
        target: StrokeId,
    },
}

fn unique(ids: &[StrokeId]) -> Vec<StrokeId> {
    let mut seen = BTreeSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Break groups into single edges.
///
/// One distinct source fans out over the target list verbatim, one
/// distinct target fans in over the source list verbatim, and anything
/// else connects every distinct source to every distinct target.
pub fn explode(groups: &[CorrespondenceGroup]) -> Vec<Connection> {
    let mut out = Vec::new();
    for g in groups {
        let edge = |source: StrokeId, target: StrokeId| Connection {
            source_frame: g.source_frame,
            target_frame: g.target_frame,
            source,
            target,
        };
        let us = g.unique_sources();
        let ut = g.unique_targets();
        if us.is_empty() || ut.is_empty() {
            continue;
        }
        if us.len() == 1 {
            out.extend(g.targets.iter().map(|&t| edge(us[0], t)));
        } else if ut.len() == 1 {
            out.extend(g.sources.iter().map(|&s| edge(s, ut[0])));
        } else {
            for &s in &us {
                out.extend(ut.iter().map(|&t| edge(s, t)));
            }
        }
    }
    out
}

/// Apply one edit to an edge list. Edits that do not match any edge
/// return the list unchanged.
pub fn apply_edit(connections: &[Connection], edit: &ConnectionEdit) -> Vec<Connection> {
    let mut out = connections.to_vec();
    match *edit {
        ConnectionEdit::Connect { source_frame, target_frame, ref sources, target, overwrite } => {
            let sources = unique(sources);
            if overwrite {
                out.retain(|c| {
                    !(c.same_pair(source_frame, target_frame) && c.target == target && !sources.contains(&c.source))
                });
            }
            for s in sources {
                let exists = out
                    .iter()
                    .any(|c| c.same_pair(source_frame, target_frame) && c.source == s && c.target == target);
                if !exists {
                    out.push(Connection { source_frame, target_frame, source: s, target });
                }
            }
        }
        ConnectionEdit::Retarget { source_frame, target_frame, source, from, to, policy } => {
            if from == to {
                return out;
            }
            let idx = match out
                .iter()
                .position(|c| c.same_pair(source_frame, target_frame) && c.source == source && c.target == from)
            {
                Some(i) => i,
                None => return out,
            };
            let conflicting = |c: &Connection| c.same_pair(source_frame, target_frame) && c.target == to && c.source != source;
            match policy {
                ConflictPolicy::Coexist => {}
                ConflictPolicy::Overwrite => {
                    out[idx].target = to;
                    out.retain(|c| !conflicting(c));
                    return out;
                }
                ConflictPolicy::Swap => {
                    for c in out.iter_mut().filter(|c| conflicting(c)) {
                        c.target = from;
                    }
                }
            }
            out[idx].target = to;
        }
        ConnectionEdit::Disconnect { source_frame, target_frame, source, target } => {
            out.retain(|c| !(c.same_pair(source_frame, target_frame) && c.source == source && c.target == target));
        }
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Side {
    Source,
    Target,
}

type NodeKey = (Side, u32, u32, StrokeId);

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Rebuild groups by connected component over the bipartite edge graph.
///
/// Components come out in order of their first edge. A component with one
/// distinct source keeps its full target list (duplicates included), and
/// symmetrically for one distinct target; otherwise both sides collapse to
/// distinct ids.
pub fn regroup(connections: &[Connection]) -> Vec<CorrespondenceGroup> {
    let mut index: BTreeMap<NodeKey, usize> = BTreeMap::new();
    let mut parent: Vec<usize> = Vec::new();
    let mut node = |key: NodeKey, parent: &mut Vec<usize>| -> usize {
        *index.entry(key).or_insert_with(|| {
            parent.push(parent.len());
            parent.len() - 1
        })
    };

    let mut edge_nodes = Vec::with_capacity(connections.len());
    for c in connections {
        let a = node((Side::Source, c.source_frame, c.target_frame, c.source), &mut parent);
        let b = node((Side::Target, c.source_frame, c.target_frame, c.target), &mut parent);
        let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
        if ra != rb {
            parent[rb] = ra;
        }
        edge_nodes.push(a);
    }

    let mut order: Vec<usize> = Vec::new();
    let mut members: BTreeMap<usize, Vec<&Connection>> = BTreeMap::new();
    for (c, &a) in connections.iter().zip(&edge_nodes) {
        let root = find(&mut parent, a);
        let list = members.entry(root).or_default();
        if list.is_empty() {
            order.push(root);
        }
        list.push(c);
    }

    let mut groups = Vec::with_capacity(order.len());
    for root in order {
        let edges = &members[&root];
        let sources: Vec<StrokeId> = edges.iter().map(|c| c.source).collect();
        let targets: Vec<StrokeId> = edges.iter().map(|c| c.target).collect();
        let (us, ut) = (unique(&sources), unique(&targets));
        let (sources, targets) = if us.len() == 1 {
            (vec![us[0]; targets.len()], targets)
        } else if ut.len() == 1 {
            (sources.clone(), vec![ut[0]; sources.len()])
        } else {
            debug!("regroup: {} sources x {} targets collapsed to a many-to-many group", us.len(), ut.len());
            (us, ut)
        };
        groups.push(CorrespondenceGroup {
            source_frame: edges[0].source_frame,
            target_frame: edges[0].target_frame,
            sources,
            targets,
        });
    }
    groups
}

/// Caller-owned, versioned correspondence collection. The version is part
/// of the tween memo key and changes whenever the groups do.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingSet {
    #[serde(default)]
    pub version: u64,
    pub groups: Vec<CorrespondenceGroup>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: Vec<CorrespondenceGroup>) -> Self {
        Self { version: 0, groups }
    }

    /// Groups declared between the two keyframes, in stored order.
    pub fn for_pair(&self, source_frame: u32, target_frame: u32) -> Vec<&CorrespondenceGroup> {
        self.groups.iter().filter(|g| g.is_pair(source_frame, target_frame)).collect()
    }

    pub fn connections(&self) -> Vec<Connection> {
        explode(&self.groups)
    }

    /// Explode, edit, regroup. Returns true when the stored groups changed.
    pub fn apply(&mut self, edit: &ConnectionEdit) -> bool {
        let edited = apply_edit(&self.connections(), edit);
        self.replace(regroup(&edited))
    }

    /// Swap in a new group list, bumping the version when it differs.
    pub fn replace(&mut self, groups: Vec<CorrespondenceGroup>) -> bool {
        if groups == self.groups {
            return false;
        }
        self.groups = groups;
        self.version += 1;
        true
    }

    pub fn bound_sources(&self, source_frame: u32, target_frame: u32) -> BTreeSet<StrokeId> {
        self.for_pair(source_frame, target_frame)
            .into_iter()
            .flat_map(|g| g.sources.iter().copied())
            .collect()
    }

    pub fn bound_targets(&self, source_frame: u32, target_frame: u32) -> BTreeSet<StrokeId> {
        self.for_pair(source_frame, target_frame)
            .into_iter()
            .flat_map(|g| g.targets.iter().copied())
            .collect()
    }
}
