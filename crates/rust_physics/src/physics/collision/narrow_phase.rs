//! Narrow-phase intersection tests
//!
//! Every test answers "do these two volumes overlap, and if so how". The
//! answer is a [`ContactInfo`] whose normal always points from the FIRST
//! volume towards the SECOND; resolution pushes the first body along
//! `-normal` and the second along `+normal`. Tests never touch body state.

use crate::foundation::math::{Transform, Vec3};
use crate::physics::broad_phase::CollisionPair;

use super::volume::CollisionVolume;

/// Parallel edge pairs produce a near-zero cross product and are skipped
const DEGENERATE_AXIS_EPSILON: f32 = 1e-6;

/// An edge axis must beat the best face axis by this factor...
const EDGE_AXIS_RELATIVE_TOLERANCE: f32 = 0.95;

/// ...and by this absolute margin before it is used as the contact normal
const EDGE_AXIS_ABSOLUTE_TOLERANCE: f32 = 0.01;

/// Points closer than this are merged when building a box manifold
const POINT_MERGE_DISTANCE_SQ: f32 = 1e-8;

/// Geometry of a confirmed overlap
#[derive(Debug, Clone, PartialEq)]
pub struct ContactInfo {
    /// Unit normal from the first volume towards the second
    pub normal: Vec3,
    /// Overlap depth along the normal, never negative
    pub penetration: f32,
    /// World space contact points (at least one)
    pub points: Vec<Vec3>,
}

impl ContactInfo {
    fn single(normal: Vec3, penetration: f32, point: Vec3) -> Self {
        Self {
            normal,
            penetration: penetration.max(0.0),
            points: vec![point],
        }
    }

    /// Average of the contact points
    pub fn centroid(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::zeros();
        }
        self.points.iter().sum::<Vec3>() / self.points.len() as f32
    }

    /// Same contact seen from the other volume
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// A confirmed contact between two world objects, valid for one substep
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// The two objects; the normal points from `pair.a` to `pair.b`
    pub pair: CollisionPair,
    /// Contact geometry
    pub info: ContactInfo,
}

/// Run the exact test for this pair of volumes
pub fn test_intersection(
    volume_a: &CollisionVolume,
    transform_a: &Transform,
    volume_b: &CollisionVolume,
    transform_b: &Transform,
) -> Option<ContactInfo> {
    use CollisionVolume::{Aabb, Obb, Sphere};

    let pos_a = transform_a.position;
    let pos_b = transform_b.position;

    match (volume_a, volume_b) {
        (Sphere { radius: ra }, Sphere { radius: rb }) => sphere_sphere(pos_a, *ra, pos_b, *rb),

        (Aabb { half_extents: ha }, Aabb { half_extents: hb }) => aabb_aabb(pos_a, *ha, pos_b, *hb),

        (Aabb { .. } | Obb { .. }, Sphere { radius }) => {
            box_sphere(&BoxFrame::new(volume_a, transform_a), pos_b, *radius)
        }

        (Sphere { radius }, Aabb { .. } | Obb { .. }) => {
            box_sphere(&BoxFrame::new(volume_b, transform_b), pos_a, *radius).map(ContactInfo::flipped)
        }

        (Obb { .. }, Obb { .. } | Aabb { .. }) | (Aabb { .. }, Obb { .. }) => box_box_sat(
            &BoxFrame::new(volume_a, transform_a),
            &BoxFrame::new(volume_b, transform_b),
        ),
    }
}

/// Sphere against sphere
pub fn sphere_sphere(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> Option<ContactInfo> {
    let delta = center_b - center_a;
    let radius_sum = radius_a + radius_b;
    let distance_sq = delta.magnitude_squared();

    if distance_sq >= radius_sum * radius_sum {
        return None;
    }

    let distance = distance_sq.sqrt();
    // Coincident centres have no preferred direction; pick up
    let normal = if distance > DEGENERATE_AXIS_EPSILON { delta / distance } else { Vec3::y() };
    let penetration = radius_sum - distance;
    let point = center_a + normal * (radius_a - penetration * 0.5);

    Some(ContactInfo::single(normal, penetration, point))
}

/// Axis-aligned box against axis-aligned box, resolved along the shallowest face
pub fn aabb_aabb(center_a: Vec3, half_a: Vec3, center_b: Vec3, half_b: Vec3) -> Option<ContactInfo> {
    let delta = center_b - center_a;
    let total = half_a + half_b;

    if delta.x.abs() >= total.x || delta.y.abs() >= total.y || delta.z.abs() >= total.z {
        return None;
    }

    let min_a = center_a - half_a;
    let max_a = center_a + half_a;
    let min_b = center_b - half_b;
    let max_b = center_b + half_b;

    let faces = [
        -Vec3::x(), Vec3::x(),
        -Vec3::y(), Vec3::y(),
        -Vec3::z(), Vec3::z(),
    ];
    let distances = [
        max_b.x - min_a.x, // B is left of A
        max_a.x - min_b.x, // B is right of A
        max_b.y - min_a.y, // B is below A
        max_a.y - min_b.y, // B is above A
        max_b.z - min_a.z, // B is behind A
        max_a.z - min_b.z, // B is in front of A
    ];

    let mut best = 0;
    for i in 1..distances.len() {
        if distances[i] < distances[best] {
            best = i;
        }
    }

    let overlap_min = min_a.sup(&min_b);
    let overlap_max = max_a.inf(&max_b);
    let point = (overlap_min + overlap_max) * 0.5;

    Some(ContactInfo::single(faces[best], distances[best], point))
}

/// Box (axis-aligned or oriented) against sphere; normal points box -> sphere
fn box_sphere(frame: &BoxFrame, sphere_center: Vec3, radius: f32) -> Option<ContactInfo> {
    let diff = sphere_center - frame.center;
    let local = Vec3::new(diff.dot(&frame.axes[0]), diff.dot(&frame.axes[1]), diff.dot(&frame.axes[2]));
    let clamped = local.sup(&-frame.half).inf(&frame.half);
    let closest = frame.to_world(clamped);

    let to_sphere = sphere_center - closest;
    let distance_sq = to_sphere.magnitude_squared();
    if distance_sq >= radius * radius {
        return None;
    }

    let distance = distance_sq.sqrt();
    if distance < DEGENERATE_AXIS_EPSILON {
        // Centre inside the box: leave through the nearest face
        let mut min_pen = f32::MAX;
        let mut normal = Vec3::y();
        for i in 0..3 {
            let pen_pos = frame.half[i] - local[i];
            let pen_neg = frame.half[i] + local[i];
            if pen_pos < min_pen {
                min_pen = pen_pos;
                normal = frame.axes[i];
            }
            if pen_neg < min_pen {
                min_pen = pen_neg;
                normal = -frame.axes[i];
            }
        }
        let point = sphere_center + normal * min_pen;
        return Some(ContactInfo::single(normal, min_pen + radius, point));
    }

    let normal = to_sphere / distance;
    Some(ContactInfo::single(normal, radius - distance, closest))
}

/// Which kind of axis separated least
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisSource {
    FaceA(usize),
    FaceB(usize),
    Edge,
}

#[derive(Debug, Clone, Copy)]
struct AxisCandidate {
    axis: Vec3,
    overlap: f32,
    source: AxisSource,
}

/// Separating-axis test over the 15 candidate axes of two boxes
fn box_box_sat(a: &BoxFrame, b: &BoxFrame) -> Option<ContactInfo> {
    let t = b.center - a.center;

    let mut best_face: Option<AxisCandidate> = None;
    let mut best_edge: Option<AxisCandidate> = None;

    let consider = |best: &mut Option<AxisCandidate>, candidate: AxisCandidate| {
        if best.map_or(true, |current| candidate.overlap < current.overlap) {
            *best = Some(candidate);
        }
    };

    for i in 0..3 {
        let axis = a.axes[i];
        let overlap = sat_overlap(axis, a, b, t)?;
        consider(&mut best_face, AxisCandidate { axis, overlap, source: AxisSource::FaceA(i) });
    }

    for i in 0..3 {
        let axis = b.axes[i];
        let overlap = sat_overlap(axis, a, b, t)?;
        consider(&mut best_face, AxisCandidate { axis, overlap, source: AxisSource::FaceB(i) });
    }

    for edge_a in &a.axes {
        for edge_b in &b.axes {
            let axis = edge_a.cross(edge_b);
            let length = axis.magnitude();
            if length < DEGENERATE_AXIS_EPSILON {
                continue; // Parallel edges
            }
            let axis = axis / length;
            let overlap = sat_overlap(axis, a, b, t)?;
            consider(&mut best_edge, AxisCandidate { axis, overlap, source: AxisSource::Edge });
        }
    }

    // Face axes always exist; edge axes only win by a clear margin
    let face = best_face?;
    let best = match best_edge {
        Some(edge)
            if edge.overlap
                < face.overlap * EDGE_AXIS_RELATIVE_TOLERANCE - EDGE_AXIS_ABSOLUTE_TOLERANCE =>
        {
            edge
        }
        _ => face,
    };

    let normal = if best.axis.dot(&t) < 0.0 { -best.axis } else { best.axis };

    let points = match best.source {
        AxisSource::FaceA(i) => face_contact_points(a, i, b, normal),
        AxisSource::FaceB(i) => face_contact_points(b, i, a, -normal),
        AxisSource::Edge => Vec::new(),
    };
    let points = if points.is_empty() { vec![edge_contact_point(a, b, normal)] } else { points };

    Some(ContactInfo {
        normal,
        penetration: best.overlap,
        points,
    })
}

/// Overlap of both boxes projected on `axis`, or `None` when it separates them
fn sat_overlap(axis: Vec3, a: &BoxFrame, b: &BoxFrame, t: Vec3) -> Option<f32> {
    let overlap = a.projected_radius(&axis) + b.projected_radius(&axis) - t.dot(&axis).abs();
    (overlap > 0.0).then_some(overlap)
}

/// Vertices of the incident box lying behind the reference face, clamped
/// laterally onto that face. `normal` points from reference to incident.
fn face_contact_points(reference: &BoxFrame, face: usize, incident: &BoxFrame, normal: Vec3) -> Vec<Vec3> {
    let face_plane = reference.center.dot(&normal) + reference.projected_radius(&normal);
    let mut points: Vec<Vec3> = Vec::with_capacity(4);

    for vertex in incident.vertices() {
        if vertex.dot(&normal) > face_plane + DEGENERATE_AXIS_EPSILON {
            continue;
        }

        let mut local = reference.to_local(vertex);
        for axis in 0..3 {
            if axis != face {
                local[axis] = local[axis].clamp(-reference.half[axis], reference.half[axis]);
            }
        }
        let point = reference.to_world(local);

        if points.iter().all(|p| (p - point).magnitude_squared() > POINT_MERGE_DISTANCE_SQ) {
            points.push(point);
        }
    }

    points
}

/// Single contact point midway between the two touching supports
fn edge_contact_point(a: &BoxFrame, b: &BoxFrame, normal: Vec3) -> Vec3 {
    let proj_a = a.projected_radius(&normal);
    let proj_b = b.projected_radius(&normal);
    let face_a = a.center.dot(&normal) + proj_a;
    let face_b = b.center.dot(&normal) - proj_b;
    let contact_plane = (face_a + face_b) * 0.5;

    // The smaller box's centre gives the lateral position
    let reference = if proj_a > proj_b { b.center } else { a.center };
    reference + normal * (contact_plane - reference.dot(&normal))
}

/// A box reduced to centre, world axes and half extents
#[derive(Debug, Clone, Copy)]
struct BoxFrame {
    center: Vec3,
    axes: [Vec3; 3],
    half: Vec3,
}

impl BoxFrame {
    fn new(volume: &CollisionVolume, transform: &Transform) -> Self {
        match volume {
            CollisionVolume::Aabb { half_extents } => Self {
                center: transform.position,
                axes: [Vec3::x(), Vec3::y(), Vec3::z()],
                half: *half_extents,
            },
            CollisionVolume::Obb { half_extents } => {
                let rotation = transform.rotation_matrix();
                Self {
                    center: transform.position,
                    axes: [
                        rotation.column(0).into_owned(),
                        rotation.column(1).into_owned(),
                        rotation.column(2).into_owned(),
                    ],
                    half: *half_extents,
                }
            }
            CollisionVolume::Sphere { radius } => Self {
                center: transform.position,
                axes: [Vec3::x(), Vec3::y(), Vec3::z()],
                half: Vec3::repeat(*radius),
            },
        }
    }

    fn projected_radius(&self, axis: &Vec3) -> f32 {
        (0..3).map(|i| self.half[i] * self.axes[i].dot(axis).abs()).sum()
    }

    fn to_local(&self, point: Vec3) -> Vec3 {
        let d = point - self.center;
        Vec3::new(d.dot(&self.axes[0]), d.dot(&self.axes[1]), d.dot(&self.axes[2]))
    }

    fn to_world(&self, local: Vec3) -> Vec3 {
        self.center + self.axes[0] * local.x + self.axes[1] * local.y + self.axes[2] * local.z
    }

    fn vertices(&self) -> [Vec3; 8] {
        let mut out = [Vec3::zeros(); 8];
        for (i, vertex) in out.iter_mut().enumerate() {
            let sign = |bit: usize| if i & bit == 0 { -1.0 } else { 1.0 };
            *vertex = self.to_world(Vec3::new(
                sign(1) * self.half.x,
                sign(2) * self.half.y,
                sign(4) * self.half.z,
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils;
    use approx::assert_relative_eq;

    fn at(position: Vec3) -> Transform {
        Transform::from_position(position)
    }

    #[test]
    fn test_sphere_sphere_intersection() {
        let contact = test_intersection(
            &CollisionVolume::sphere(1.0),
            &at(Vec3::zeros()),
            &CollisionVolume::sphere(1.0),
            &at(Vec3::new(1.5, 0.0, 0.0)),
        )
        .expect("spheres overlap");

        assert_relative_eq!(contact.normal, Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(contact.penetration, 0.5, epsilon = 1e-6);
        assert_relative_eq!(contact.centroid(), Vec3::new(0.75, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_sphere_touching_is_not_contact() {
        assert!(sphere_sphere(Vec3::zeros(), 1.0, Vec3::new(2.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_aabb_aabb_picks_shallowest_face() {
        let contact = aabb_aabb(Vec3::zeros(), Vec3::repeat(1.0), Vec3::new(0.2, 1.5, 0.0), Vec3::repeat(1.0))
            .expect("boxes overlap");

        assert_relative_eq!(contact.normal, Vec3::y());
        assert_relative_eq!(contact.penetration, 0.5, epsilon = 1e-6);
        assert_relative_eq!(contact.points[0].y, 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_aabb_aabb_normal_points_towards_second() {
        let contact = aabb_aabb(Vec3::zeros(), Vec3::repeat(1.0), Vec3::new(-1.8, 0.0, 0.0), Vec3::repeat(1.0))
            .expect("boxes overlap");
        assert_relative_eq!(contact.normal, -Vec3::x());
        assert_relative_eq!(contact.penetration, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_reversed_order_flips_normal() {
        let sphere = CollisionVolume::sphere(1.0);
        let floor = CollisionVolume::aabb(Vec3::new(10.0, 1.0, 10.0));
        let sphere_tf = at(Vec3::new(0.0, 1.8, 0.0));
        let floor_tf = at(Vec3::zeros());

        let box_first = test_intersection(&floor, &floor_tf, &sphere, &sphere_tf).expect("overlap");
        let sphere_first = test_intersection(&sphere, &sphere_tf, &floor, &floor_tf).expect("overlap");

        assert_relative_eq!(box_first.normal, Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(sphere_first.normal, -Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(box_first.penetration, sphere_first.penetration);
        assert_relative_eq!(box_first.penetration, 0.2, epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_centre_inside_box() {
        let contact = test_intersection(
            &CollisionVolume::aabb(Vec3::new(5.0, 1.0, 5.0)),
            &at(Vec3::zeros()),
            &CollisionVolume::sphere(0.5),
            &at(Vec3::new(0.0, 0.7, 0.0)),
        )
        .expect("sphere inside box");

        assert_relative_eq!(contact.normal, Vec3::y());
        assert_relative_eq!(contact.penetration, 0.8, epsilon = 1e-5);
        assert!(contact.normal.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_obb_sphere_uses_orientation() {
        let rotation = utils::axis_angle_degrees(Vec3::z(), 45.0);
        let box_tf = Transform::from_position_orientation(Vec3::zeros(), rotation);
        let obb = CollisionVolume::obb(Vec3::repeat(1.0));
        let sphere = CollisionVolume::sphere(0.5);

        // Just outside the unrotated face, but inside the rotated corner's reach
        let sphere_tf = at(Vec3::new(1.6, 0.0, 0.0));
        let contact = test_intersection(&obb, &box_tf, &sphere, &sphere_tf).expect("corner overlaps sphere");
        assert_relative_eq!(contact.normal, Vec3::x(), epsilon = 1e-4);

        let as_aabb = test_intersection(&CollisionVolume::aabb(Vec3::repeat(1.0)), &box_tf, &sphere, &sphere_tf);
        assert!(as_aabb.is_none());
    }

    #[test]
    fn test_obb_obb_rotated_overlap() {
        let a = CollisionVolume::obb(Vec3::repeat(1.0));
        let b = CollisionVolume::obb(Vec3::repeat(1.0));
        let rotation = utils::axis_angle_degrees(Vec3::z(), 45.0);
        let tf_b = Transform::from_position_orientation(Vec3::new(2.2, 0.0, 0.0), rotation);

        let contact = test_intersection(&a, &at(Vec3::zeros()), &b, &tf_b).expect("boxes overlap");
        assert_relative_eq!(contact.normal, Vec3::x(), epsilon = 1e-5);
        assert_relative_eq!(contact.penetration, 2.0_f32.sqrt() + 1.0 - 2.2, epsilon = 1e-4);
        assert!(!contact.points.is_empty());
        assert!(contact.points.iter().all(|p| p.x <= 1.0 + 1e-4));
    }

    #[test]
    fn test_obb_obb_separated_by_rotation() {
        let a = CollisionVolume::obb(Vec3::repeat(1.0));
        let b = CollisionVolume::obb(Vec3::repeat(1.0));
        let rotation = utils::axis_angle_degrees(Vec3::z(), 45.0);
        let tf_b = Transform::from_position_orientation(Vec3::new(2.5, 0.0, 0.0), rotation);

        assert!(test_intersection(&a, &at(Vec3::zeros()), &b, &tf_b).is_none());
    }

    #[test]
    fn test_obb_stack_prefers_face_axis_and_builds_manifold() {
        let a = CollisionVolume::obb(Vec3::repeat(1.0));
        let b = CollisionVolume::obb(Vec3::repeat(1.0));

        let contact = test_intersection(&a, &at(Vec3::zeros()), &b, &at(Vec3::new(0.0, 1.9, 0.0)))
            .expect("stacked boxes overlap");

        assert_relative_eq!(contact.normal, Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(contact.penetration, 0.1, epsilon = 1e-5);
        assert_eq!(contact.points.len(), 4);
        for point in &contact.points {
            assert_relative_eq!(point.y, 0.9, epsilon = 1e-5);
        }
        assert_relative_eq!(contact.centroid(), Vec3::new(0.0, 0.9, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_obb_against_aabb_floor() {
        let floor = CollisionVolume::aabb(Vec3::new(10.0, 1.0, 10.0));
        let cube = CollisionVolume::obb(Vec3::repeat(0.5));
        let rotation = utils::axis_angle_degrees(Vec3::y(), 30.0);
        let cube_tf = Transform::from_position_orientation(Vec3::new(0.0, 1.4, 0.0), rotation);

        let contact = test_intersection(&floor, &at(Vec3::zeros()), &cube, &cube_tf).expect("cube rests in floor");
        assert_relative_eq!(contact.normal, Vec3::y(), epsilon = 1e-5);
        assert_relative_eq!(contact.penetration, 0.1, epsilon = 1e-5);
        assert_eq!(contact.points.len(), 4);
    }
}
