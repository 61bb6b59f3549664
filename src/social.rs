use std::collections::{HashMap, HashSet};

use crate::{
    error::{FusionError, FusionResult},
    registry::PersonRegistry,
    types::{PersonId, SocialRole},
};

/// Assigns a speaking / listening role to everyone from mouth, gesture and gaze features.
///
/// 1. Everyone with an open mouth speaks.
/// 2. Everyone else listens.
/// 3. If nobody's mouth is open, the first gesturing person in registry order speaks instead,
///    and everyone looking at them listens.
///
/// Gaze links are validated first: a link to an unknown person or to oneself is an upstream
/// contract violation.
pub fn classify(registry: &PersonRegistry) -> FusionResult<HashMap<PersonId, SocialRole>> {
    validate_gaze_links(registry)?;

    let mut roles: Vec<(PersonId, SocialRole)> = Vec::with_capacity(registry.len());
    let mut speaking: HashSet<PersonId> = HashSet::new();

    for person in registry.iter() {
        if person.features.mouth_open {
            roles.push((person.id, SocialRole::Speaking));
            speaking.insert(person.id);
        } else {
            roles.push((person.id, SocialRole::Undetermined));
        }
    }

    // Everyone left listens, whether or not their gaze lands on a speaker. The gaze check only
    // feeds the log.
    for (person, (id, role)) in registry.iter().zip(roles.iter_mut()) {
        if *role != SocialRole::Undetermined {
            continue;
        }
        let watches_speaker = person
            .features
            .looking_at
            .is_some_and(|target| speaking.contains(&target));
        if !watches_speaker {
            log::debug!("person {id} does not watch a speaker, listening by default");
        }
        *role = SocialRole::Listening;
    }

    if speaking.is_empty() {
        if let Some(fallback) = registry.iter().find(|p| p.features.gesturing) {
            log::debug!(
                "no open mouth in scene, promoting gesturing person {} to speaker",
                fallback.id
            );
            for (person, (id, role)) in registry.iter().zip(roles.iter_mut()) {
                if *id == fallback.id {
                    *role = SocialRole::Speaking;
                } else if person.features.looking_at == Some(fallback.id) {
                    *role = SocialRole::Listening;
                }
            }
        }
    }

    debug_assert!(roles.iter().all(|(_, r)| *r != SocialRole::Undetermined));

    log::debug!(
        "role stage: {} speaking, {} listening",
        roles.iter().filter(|(_, r)| *r == SocialRole::Speaking).count(),
        roles.iter().filter(|(_, r)| *r == SocialRole::Listening).count()
    );

    Ok(roles.into_iter().collect())
}

fn validate_gaze_links(registry: &PersonRegistry) -> FusionResult<()> {
    for person in registry.iter() {
        let Some(target) = person.features.looking_at else {
            continue;
        };
        if target == person.id {
            return Err(FusionError::SelfGaze(person.id));
        }
        if !registry.contains(target) {
            return Err(FusionError::UnknownGazeTarget {
                person: person.id,
                target,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::Person, types::Features};

    fn person(
        id: PersonId,
        mouth_open: bool,
        gesturing: bool,
        looking_at: Option<PersonId>,
    ) -> Person {
        Person::new(id, [id as i32 * 100, 0, id as i32 * 100 + 50, 100]).with_features(Features {
            mouth_open,
            gesturing,
            looking_at,
            role: SocialRole::Undetermined,
        })
    }

    fn roles(people: Vec<Person>) -> HashMap<PersonId, SocialRole> {
        classify(&PersonRegistry::from_people(people).unwrap()).unwrap()
    }

    #[test]
    fn open_mouth_speaks_and_watcher_listens() {
        let roles = roles(vec![
            person(0, true, false, None),
            person(1, false, false, Some(0)),
            person(2, false, false, None),
        ]);
        assert_eq!(roles[&0], SocialRole::Speaking);
        assert_eq!(roles[&1], SocialRole::Listening);
        assert_eq!(roles[&2], SocialRole::Listening);
    }

    #[test]
    fn gesturing_fallback_speaker() {
        let roles = roles(vec![person(0, false, true, None), person(1, false, false, Some(0))]);
        assert_eq!(roles[&0], SocialRole::Speaking);
        assert_eq!(roles[&1], SocialRole::Listening);
    }

    #[test]
    fn nobody_talks_or_gestures_everyone_listens() {
        let roles = roles(vec![
            person(0, false, false, Some(1)),
            person(1, false, false, Some(0)),
            person(2, false, false, None),
        ]);
        assert!(roles.values().all(|r| *r == SocialRole::Listening));
    }

    #[test]
    fn only_first_gesturing_person_is_promoted() {
        let roles = roles(vec![
            person(0, false, false, Some(2)),
            person(1, false, true, None),
            person(2, false, true, None),
        ]);
        assert_eq!(roles[&1], SocialRole::Speaking);
        assert_eq!(roles[&2], SocialRole::Listening);
        assert_eq!(roles[&0], SocialRole::Listening);
    }

    #[test]
    fn gesture_fallback_is_skipped_when_someone_talks() {
        let roles = roles(vec![person(0, false, true, None), person(1, true, false, None)]);
        assert_eq!(roles[&0], SocialRole::Listening);
        assert_eq!(roles[&1], SocialRole::Speaking);
    }

    #[test]
    fn open_mouth_is_never_demoted() {
        let roles = roles(vec![
            person(0, true, false, Some(1)),
            person(1, true, true, Some(0)),
        ]);
        assert_eq!(roles[&0], SocialRole::Speaking);
        assert_eq!(roles[&1], SocialRole::Speaking);
    }

    #[test]
    fn no_undetermined_survives() {
        let roles = roles(vec![
            person(0, false, false, None),
            person(1, true, false, None),
            person(2, false, true, Some(1)),
        ]);
        assert_eq!(roles.len(), 3);
        assert!(roles.values().all(|r| *r != SocialRole::Undetermined));
    }

    #[test]
    fn empty_scene() {
        assert!(roles(Vec::new()).is_empty());
    }

    #[test]
    fn dangling_gaze_link_is_an_error() {
        let registry = PersonRegistry::from_people(vec![
            person(0, true, false, None),
            person(1, false, false, Some(9)),
        ])
        .unwrap();
        let err = classify(&registry).unwrap_err();
        assert_eq!(
            err,
            FusionError::UnknownGazeTarget {
                person: 1,
                target: 9
            }
        );
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn self_gaze_is_an_error() {
        let registry = PersonRegistry::from_people(vec![person(4, false, false, Some(4))]).unwrap();
        assert_eq!(classify(&registry).unwrap_err(), FusionError::SelfGaze(4));
    }
}
