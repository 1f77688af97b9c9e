use crate::{
    element::{FH, HH, VH},
    topol::Topology,
};

/// Walks halfedges by repeatedly applying `step`, until it comes back to the
/// halfedge it started from.
struct Circulator<'a> {
    topol: &'a Topology,
    start: Option<HH>,
    current: Option<HH>,
    step: fn(&Topology, HH) -> HH,
}

impl<'a> Circulator<'a> {
    fn new(topol: &'a Topology, start: Option<HH>, step: fn(&Topology, HH) -> HH) -> Self {
        Circulator {
            topol,
            start,
            current: start,
            step,
        }
    }
}

impl Iterator for Circulator<'_> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let next = (self.step)(self.topol, current);
        self.current = match self.start {
            Some(start) if start != next => Some(next),
            _ => None,
        };
        Some(current)
    }
}

fn ccw_rotated(topol: &Topology, h: HH) -> HH {
    topol.prev_halfedge(h).opposite()
}

fn cw_rotated(topol: &Topology, h: HH) -> HH {
    topol.next_halfedge(h.opposite())
}

fn loop_next(topol: &Topology, h: HH) -> HH {
    topol.next_halfedge(h)
}

pub(crate) fn voh_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    Circulator::new(topol, topol.vertex_halfedge(v), ccw_rotated)
}

pub(crate) fn voh_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    Circulator::new(topol, topol.vertex_halfedge(v), cw_rotated)
}

pub(crate) fn vih_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| h.opposite())
}

pub(crate) fn vv_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| topol.to_vertex(h))
}

pub(crate) fn vf_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = FH> + use<'_> {
    voh_ccw_iter(topol, v).filter_map(|h| topol.halfedge_face(h))
}

/// Follows `next` links from `h` until the loop closes. For a halfedge on
/// the boundary, this walks the boundary loop it belongs to.
pub(crate) fn loop_ccw_iter(topol: &Topology, h: HH) -> impl Iterator<Item = HH> + use<'_> {
    Circulator::new(topol, Some(h), loop_next)
}

pub(crate) fn fh_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = HH> + use<'_> {
    loop_ccw_iter(topol, topol.face_halfedge(f))
}

pub(crate) fn fv_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = VH> + use<'_> {
    fh_ccw_iter(topol, f).map(|h| topol.to_vertex(h))
}
