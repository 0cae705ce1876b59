//! Reduction of per-marker reference-point estimates into one robust point.

use crate::DetectedMarker;
use marker_rig_catalog::Configuration;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Stabilizer added to the reprojection error before inversion, so a
/// perfectly converged solve does not collapse the weighted average onto a
/// single marker.
const WEIGHT_EPS: f64 = 1e-6;

/// One single-marker estimate of the reference point, in camera space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidatePoint {
    pub point: Point3<f64>,
    /// Member marker that contributed this estimate.
    pub marker_id: u32,
    /// That marker's solver reprojection error.
    pub reprojection_error: f64,
}

/// How a candidate set is reduced to one point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionStrategy {
    /// Select the whole candidate ranked `floor(n/2)` by X coordinate.
    ///
    /// On even counts this picks the upper-middle element, not the mean
    /// of the two middles.
    #[default]
    Median,
    /// Average the candidates, weighting each by the inverse of its
    /// marker's reprojection error.
    WeightedAverage,
}

/// Compute one candidate per visible member marker of `config`.
///
/// A member contributes when it appears in `markers` with a resolved pose;
/// its candidate is the stored offset rotated into camera space and
/// translated by the marker pose: `R(rvec) * offset + tvec`.
pub fn candidate_points(config: &Configuration, markers: &[DetectedMarker]) -> Vec<CandidatePoint> {
    let mut candidates = Vec::new();

    for &member_id in &config.marker_ids {
        let Some(marker) = markers.iter().find(|m| m.id == member_id) else {
            continue;
        };
        let Some(pose) = marker.pose.as_ref() else {
            continue;
        };
        let Some(offset) = config.offset_of(member_id) else {
            // validate() makes this unreachable for catalog-loaded records.
            continue;
        };

        let rotated = pose.rotation_matrix() * offset + pose.translation;
        candidates.push(CandidatePoint {
            point: Point3::from(rotated),
            marker_id: member_id,
            reprojection_error: pose.reprojection_error,
        });
    }

    candidates
}

/// Reduce a candidate set to one robust point; `None` when empty.
pub fn fuse(candidates: &[CandidatePoint], strategy: FusionStrategy) -> Option<Point3<f64>> {
    if candidates.is_empty() {
        return None;
    }
    match strategy {
        FusionStrategy::Median => Some(median_by_x(candidates)),
        FusionStrategy::WeightedAverage => Some(weighted_average(candidates)),
    }
}

/// Candidate generation plus reduction in one call.
pub fn fuse_reference_point(
    config: &Configuration,
    markers: &[DetectedMarker],
    strategy: FusionStrategy,
) -> Option<Point3<f64>> {
    fuse(&candidate_points(config, markers), strategy)
}

fn median_by_x(candidates: &[CandidatePoint]) -> Point3<f64> {
    let mut sorted: Vec<&CandidatePoint> = candidates.iter().collect();
    sorted.sort_by(|a, b| a.point.x.total_cmp(&b.point.x));
    sorted[sorted.len() / 2].point
}

fn weighted_average(candidates: &[CandidatePoint]) -> Point3<f64> {
    let mut sum = nalgebra::Vector3::zeros();
    let mut total_weight = 0.0;
    for candidate in candidates {
        let weight = 1.0 / (candidate.reprojection_error.abs() + WEIGHT_EPS);
        sum += candidate.point.coords * weight;
        total_weight += weight;
    }
    Point3::from(sum / total_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkerPose;
    use approx::assert_relative_eq;
    use marker_rig_core::Quad;
    use nalgebra::{Point2, Vector3};
    use std::collections::BTreeMap;
    use std::f64::consts::FRAC_PI_2;

    fn candidate(x: f64, err: f64) -> CandidatePoint {
        CandidatePoint {
            point: Point3::new(x, x * 2.0, x * 3.0),
            marker_id: 0,
            reprojection_error: err,
        }
    }

    fn quad() -> Quad {
        Quad::new([
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    fn marker(id: u32, rotation: Vector3<f64>, translation: Vector3<f64>) -> DetectedMarker {
        DetectedMarker {
            id,
            corners: quad(),
            pose: Some(MarkerPose {
                rotation,
                translation,
                reprojection_error: 0.5,
            }),
        }
    }

    fn config(ids: &[u32], offsets: &[Vector3<f64>]) -> Configuration {
        Configuration {
            identifier: "rig".to_string(),
            name: "RIG".to_string(),
            kind: String::new(),
            date: String::new(),
            marker_ids: ids.to_vec(),
            relative_points: ids
                .iter()
                .copied()
                .zip(offsets.iter().copied())
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn median_of_three_is_middle_candidate() {
        let candidates = [candidate(-1.0, 0.0), candidate(0.0, 0.0), candidate(1.0, 0.0)];
        let fused = fuse(&candidates, FusionStrategy::Median).unwrap();
        assert_relative_eq!(fused.x, 0.0);
        assert_relative_eq!(fused.y, 0.0);
        assert_relative_eq!(fused.z, 0.0);
    }

    #[test]
    fn median_of_four_picks_upper_middle() {
        // floor(4/2) = index 2 after the X sort, i.e. the upper-middle
        // candidate, not the mean of the two middles.
        let candidates = [
            candidate(-2.0, 0.0),
            candidate(-1.0, 0.0),
            candidate(1.0, 0.0),
            candidate(2.0, 0.0),
        ];
        let fused = fuse(&candidates, FusionStrategy::Median).unwrap();
        assert_relative_eq!(fused.x, 1.0);
        assert_relative_eq!(fused.y, 2.0);
        assert_relative_eq!(fused.z, 3.0);
    }

    #[test]
    fn median_selects_whole_candidate_not_per_axis() {
        // The Y/Z of the selected candidate ride along with its X rank.
        let candidates = [
            CandidatePoint {
                point: Point3::new(0.0, 9.0, 0.0),
                marker_id: 1,
                reprojection_error: 0.0,
            },
            CandidatePoint {
                point: Point3::new(-1.0, 1.0, 5.0),
                marker_id: 2,
                reprojection_error: 0.0,
            },
            CandidatePoint {
                point: Point3::new(1.0, -7.0, 2.0),
                marker_id: 3,
                reprojection_error: 0.0,
            },
        ];
        let fused = fuse(&candidates, FusionStrategy::Median).unwrap();
        assert_relative_eq!(fused.x, 0.0);
        assert_relative_eq!(fused.y, 9.0);
        assert_relative_eq!(fused.z, 0.0);
    }

    #[test]
    fn median_input_order_does_not_matter() {
        let mut candidates = vec![candidate(1.0, 0.0), candidate(-1.0, 0.0), candidate(0.0, 0.0)];
        let a = fuse(&candidates, FusionStrategy::Median).unwrap();
        candidates.reverse();
        let b = fuse(&candidates, FusionStrategy::Median).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_candidates_fuse_to_none() {
        assert!(fuse(&[], FusionStrategy::Median).is_none());
        assert!(fuse(&[], FusionStrategy::WeightedAverage).is_none());
    }

    #[test]
    fn weighted_average_favors_low_error_markers() {
        let candidates = [candidate(0.0, 0.001), candidate(10.0, 10.0)];
        let fused = fuse(&candidates, FusionStrategy::WeightedAverage).unwrap();
        assert!(fused.x < 0.1, "low-error candidate should dominate: {fused}");
    }

    #[test]
    fn weighted_average_of_equal_errors_is_mean() {
        let candidates = [candidate(-3.0, 1.0), candidate(3.0, 1.0)];
        let fused = fuse(&candidates, FusionStrategy::WeightedAverage).unwrap();
        assert_relative_eq!(fused.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(fused.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn candidate_applies_rotation_then_translation() {
        // A quarter turn about Z maps the offset (1,0,0) to (0,1,0); the
        // translation then shifts it to (5,1,0).
        let config = config(&[7], &[Vector3::new(1.0, 0.0, 0.0)]);
        let markers = [marker(
            7,
            Vector3::new(0.0, 0.0, FRAC_PI_2),
            Vector3::new(5.0, 0.0, 0.0),
        )];
        let candidates = candidate_points(&config, &markers);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].marker_id, 7);
        assert_relative_eq!(candidates[0].point.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(candidates[0].point.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(candidates[0].point.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn only_visible_members_with_poses_contribute() {
        let config = config(
            &[1, 2, 3],
            &[Vector3::zeros(), Vector3::zeros(), Vector3::zeros()],
        );
        let mut pose_missing = marker(2, Vector3::zeros(), Vector3::zeros());
        pose_missing.pose = None;
        let markers = [
            marker(1, Vector3::zeros(), Vector3::new(1.0, 0.0, 4.0)),
            pose_missing,
            // id 9 is visible but not a member
            marker(9, Vector3::zeros(), Vector3::new(9.0, 9.0, 9.0)),
        ];
        let candidates = candidate_points(&config, &markers);
        let ids: Vec<u32> = candidates.iter().map(|c| c.marker_id).collect();
        assert_eq!(ids, [1]);
    }

    #[test]
    fn fuse_reference_point_end_to_end() {
        // Three markers, identity rotations: candidates are offset + t.
        let config = config(
            &[1, 2, 3],
            &[
                Vector3::new(0.5, 0.0, 0.0),
                Vector3::new(-0.5, 0.0, 0.0),
                Vector3::new(0.0, 0.5, 0.0),
            ],
        );
        let markers = [
            marker(1, Vector3::zeros(), Vector3::new(-0.5, 0.0, 2.0)),
            marker(2, Vector3::zeros(), Vector3::new(0.5, 0.0, 2.0)),
            marker(3, Vector3::zeros(), Vector3::new(0.1, -0.5, 2.0)),
        ];
        // candidates: (0,0,2), (0,0,2), (0.1,0,2); median by X is (0,0,2)
        let fused = fuse_reference_point(&config, &markers, FusionStrategy::Median).unwrap();
        assert_relative_eq!(fused.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(fused.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(fused.z, 2.0, epsilon = 1e-12);
    }
}
