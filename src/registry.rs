use std::collections::HashMap;

use crate::{
    error::{FusionError, FusionResult},
    types::{
        BodyPoint, FaceObservation, Features, Keypoint, PersonDetection, PersonId, PersonReport,
        SceneReport,
    },
};

/// A detected person plus the features derived for it during one run.
#[derive(Clone, Debug)]
pub struct Person {
    pub id: PersonId,
    pub bbox: [i32; 4],
    pub face: Option<FaceObservation>,
    pub features: Features,
    keypoints: Vec<Keypoint>,
    points: HashMap<BodyPoint, (f32, f32)>,
    reported_mouth_open: Option<bool>,
}

impl Person {
    pub fn new(id: PersonId, bbox: [i32; 4]) -> Self {
        Self {
            id,
            bbox,
            face: None,
            features: Features::default(),
            keypoints: Vec::new(),
            points: HashMap::new(),
            reported_mouth_open: None,
        }
    }

    pub fn from_detection(detection: PersonDetection) -> FusionResult<Self> {
        let [x1, y1, x2, y2] = detection.bbox;
        if x1 > x2 || y1 > y2 {
            return Err(FusionError::InvalidBoundingBox {
                id: detection.id,
                bbox: detection.bbox,
            });
        }

        let mut person = Person::new(detection.id, detection.bbox);
        person.face = detection.face;
        person.reported_mouth_open = detection.mouth_open;
        for kp in detection.keypoints {
            person.push_keypoint(kp);
        }
        Ok(person)
    }

    pub fn with_keypoint(mut self, point: BodyPoint, x: i32, y: i32) -> Self {
        self.push_keypoint(Keypoint::new(point, x, y));
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    pub fn with_face(mut self, face: FaceObservation) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_reported_mouth_open(mut self, mouth_open: bool) -> Self {
        self.reported_mouth_open = Some(mouth_open);
        self
    }

    // Repeated point ids keep the last reported position.
    fn push_keypoint(&mut self, kp: Keypoint) {
        if let Some(point) = BodyPoint::from_index(kp.point_id) {
            self.points.insert(point, kp.position());
        }
        self.keypoints.push(kp);
    }

    pub fn keypoint(&self, point: BodyPoint) -> Option<(f32, f32)> {
        self.points.get(&point).copied()
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    /// Mouth flag handed over directly by the face collaborator, if any.
    pub fn reported_mouth_open(&self) -> Option<bool> {
        self.reported_mouth_open
            .or_else(|| self.face.as_ref().and_then(|face| face.mouth_open))
    }

    pub fn center(&self) -> (f32, f32) {
        let [x1, y1, x2, y2] = self.bbox;
        ((x1 + x2) as f32 / 2.0, (y1 + y2) as f32 / 2.0)
    }

    pub fn into_report(self) -> PersonReport {
        PersonReport {
            id: self.id,
            bbox: self.bbox,
            keypoints: self.keypoints,
            face: self.face,
            mouth_open: self.features.mouth_open,
            gesturing: self.features.gesturing,
            looking_at: self.features.looking_at,
            role: self.features.role,
        }
    }
}

/// People of one scene in detection order, indexed by id.
#[derive(Clone, Debug, Default)]
pub struct PersonRegistry {
    people: Vec<Person>,
    index: HashMap<PersonId, usize>,
}

impl PersonRegistry {
    pub fn from_detections(detections: Vec<PersonDetection>) -> FusionResult<Self> {
        let people = detections
            .into_iter()
            .map(Person::from_detection)
            .collect::<FusionResult<Vec<_>>>()?;
        Self::from_people(people)
    }

    pub fn from_people(people: Vec<Person>) -> FusionResult<Self> {
        let mut index = HashMap::with_capacity(people.len());
        for (slot, person) in people.iter().enumerate() {
            if index.insert(person.id, slot).is_some() {
                return Err(FusionError::DuplicatePersonId(person.id));
            }
        }
        Ok(Self { people, index })
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.index.get(&id).map(|&slot| &self.people[slot])
    }

    pub fn features_mut(&mut self, id: PersonId) -> FusionResult<&mut Features> {
        let slot = *self
            .index
            .get(&id)
            .ok_or(FusionError::UnknownPerson(id))?;
        Ok(&mut self.people[slot].features)
    }

    /// Writes one stage's per-person results back into the feature bags.
    pub fn apply<T, F>(
        &mut self,
        results: &HashMap<PersonId, T>,
        mut write: F,
    ) -> FusionResult<()>
    where
        F: FnMut(&mut Features, &T),
    {
        for (&id, value) in results {
            write(self.features_mut(id)?, value);
        }
        Ok(())
    }

    pub fn into_report(self) -> SceneReport {
        SceneReport {
            people: self.people.into_iter().map(Person::into_report).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(id: PersonId, bbox: [i32; 4]) -> PersonDetection {
        PersonDetection {
            id,
            bbox,
            keypoints: Vec::new(),
            mouth_open: None,
            face: None,
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = PersonRegistry::from_detections(vec![
            detection(0, [0, 0, 10, 10]),
            detection(1, [20, 0, 30, 10]),
            detection(0, [40, 0, 50, 10]),
        ])
        .unwrap_err();
        assert_eq!(err, FusionError::DuplicatePersonId(0));
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn rejects_inverted_bbox() {
        let err = PersonRegistry::from_detections(vec![detection(3, [10, 0, 5, 10])]).unwrap_err();
        assert_eq!(
            err,
            FusionError::InvalidBoundingBox {
                id: 3,
                bbox: [10, 0, 5, 10]
            }
        );
    }

    #[test]
    fn ignores_unknown_keypoint_indices_but_keeps_them_for_output() {
        let mut det = detection(0, [0, 0, 100, 200]);
        det.keypoints = vec![
            Keypoint {
                point_id: 0,
                x: 50,
                y: 20,
            },
            Keypoint {
                point_id: 15,
                x: 40,
                y: 190,
            },
        ];
        let person = Person::from_detection(det).unwrap();
        assert_eq!(person.keypoint(BodyPoint::Nose), Some((50.0, 20.0)));
        assert_eq!(person.keypoint(BodyPoint::LeftWrist), None);
        assert_eq!(person.keypoints().len(), 2);
    }

    #[test]
    fn center_is_bbox_midpoint() {
        let person = Person::new(0, [10, 20, 31, 60]);
        assert_eq!(person.center(), (20.5, 40.0));
    }

    #[test]
    fn reported_mouth_flag_prefers_person_level_value() {
        let face = FaceObservation {
            mouth_open: Some(false),
            ..FaceObservation::default()
        };
        let person = Person::new(0, [0, 0, 1, 1])
            .with_face(face)
            .with_reported_mouth_open(true);
        assert_eq!(person.reported_mouth_open(), Some(true));
        assert_eq!(Person::new(1, [0, 0, 1, 1]).reported_mouth_open(), None);
    }

    #[test]
    fn apply_rejects_unknown_ids() {
        let mut registry =
            PersonRegistry::from_people(vec![Person::new(0, [0, 0, 1, 1])]).unwrap();
        let results = HashMap::from([(7, true)]);
        let err = registry
            .apply(&results, |features, &flag| features.gesturing = flag)
            .unwrap_err();
        assert_eq!(err, FusionError::UnknownPerson(7));
    }
}
