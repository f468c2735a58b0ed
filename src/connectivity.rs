//! Connectivity analysis in two phases.
//!
//! Phase one ([`Connectivity`]) runs during the render walk: every free pin
//! end and both ends of every net segment touch a counter keyed by their
//! output-space coordinate, and net segments are collected. Phase two
//! ([`Connectivity::reconcile`]) needs the complete segment set: a point
//! touched exactly once that lies strictly inside some segment is a
//! pass-through rather than a loose end, and gains two touches per such
//! segment.

use std::collections::HashMap;

use glam::IVec2;

/// The two endpoints of one net edge, in output space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetSegment {
    pub from: IVec2,
    pub to: IVec2,
}

impl NetSegment {
    pub fn new(from: IVec2, to: IVec2) -> Self {
        NetSegment { from, to }
    }

    /// True if `p` lies on the segment but is not one of its endpoints
    pub fn passes_through(&self, p: IVec2) -> bool {
        let d = (self.to - self.from).as_i64vec2();
        let r = (p - self.from).as_i64vec2();
        let collinear = d.x * r.y == d.y * r.x;
        let within = (self.from.x.min(self.to.x)..=self.from.x.max(self.to.x)).contains(&p.x)
            && (self.from.y.min(self.to.y)..=self.from.y.max(self.to.y)).contains(&p.y);
        collinear && within && p != self.from && p != self.to
    }
}

/// Phase one accumulator
#[derive(Debug, Clone, Default)]
pub struct Connectivity {
    /// Touched points in first-touch order
    points: Vec<IVec2>,
    counts: HashMap<IVec2, u32>,
    segments: Vec<NetSegment>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one connection at `p`
    pub fn touch(&mut self, p: IVec2) {
        match self.counts.get_mut(&p) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(p, 1);
                self.points.push(p);
            }
        }
    }

    /// Record a net segment and touch both of its ends
    pub fn add_segment(&mut self, from: IVec2, to: IVec2) {
        self.touch(from);
        self.touch(to);
        self.segments.push(NetSegment::new(from, to));
    }

    pub fn count(&self, p: IVec2) -> Option<u32> {
        self.counts.get(&p).copied()
    }

    pub fn segments(&self) -> &[NetSegment] {
        &self.segments
    }

    /// Phase two: promote pass-through points and classify every endpoint
    pub fn reconcile(self) -> Endpoints {
        let Connectivity {
            points,
            counts,
            segments,
        } = self;

        let endpoints = points
            .into_iter()
            .map(|point| {
                let mut count = counts.get(&point).copied().unwrap_or_default();
                if count == 1 {
                    let passing = segments.iter().filter(|s| s.passes_through(point)).count();
                    count += 2 * passing as u32;
                }
                Endpoint { point, count }
            })
            .collect();
        Endpoints { endpoints }
    }
}

/// How an endpoint is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// Three or more connections meet
    Junction,
    /// Two connections, nothing to mark
    Ordinary,
    /// Touches nothing else
    Dangling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub point: IVec2,
    pub count: u32,
}

impl Endpoint {
    pub fn class(&self) -> EndpointClass {
        match self.count {
            0 | 1 => EndpointClass::Dangling,
            2 => EndpointClass::Ordinary,
            _ => EndpointClass::Junction,
        }
    }
}

/// Reconciled endpoints in first-touch order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoints {
    endpoints: Vec<Endpoint>,
}

impl Endpoints {
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn get(&self, point: IVec2) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.point == point)
    }

    pub fn class_at(&self, point: IVec2) -> Option<EndpointClass> {
        self.get(point).map(Endpoint::class)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
