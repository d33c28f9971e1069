//! Random request parameters.
//!
//! Every helper takes the generator explicitly: `rand::rng()` is not `Send`,
//! so transactions draw their values before the first `.await`.

use crate::config::load_profile::{Credentials, LoadProfile};
use crate::domain::train_ticket::TripQuery;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Two distinct stations, start first.
pub fn pick_route<R: Rng + ?Sized>(rng: &mut R, stations: &[String]) -> Option<(String, String)> {
    let start = stations.choose(rng)?;
    let others: Vec<&String> = stations.iter().filter(|s| *s != start).collect();
    let end = others.choose(rng)?;
    Some((start.clone(), (*end).clone()))
}

pub fn random_train_id<R: Rng + ?Sized>(rng: &mut R, train_types: &[String]) -> Option<String> {
    let train_type = train_types.choose(rng)?;
    Some(format!("{}{}", train_type, rng.random_range(1000..=9999)))
}

pub fn pick_user<'a, R: Rng + ?Sized>(rng: &mut R, users: &'a [Credentials]) -> Option<&'a Credentials> {
    users.choose(rng)
}

pub fn pick_seat_type<R: Rng + ?Sized>(rng: &mut R, seat_types: &[i32]) -> Option<i32> {
    seat_types.choose(rng).copied()
}

pub fn pick_station<R: Rng + ?Sized>(rng: &mut R, stations: &[String]) -> Option<String> {
    stations.choose(rng).cloned()
}

pub fn trip_query<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &LoadProfile,
    train_type: Option<&str>,
) -> Option<TripQuery> {
    let (starting_place, end_place) = pick_route(rng, &profile.stations)?;
    Some(TripQuery {
        starting_place,
        end_place,
        departure_time: profile.departure_date.clone(),
        train_type: train_type.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stations(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_route_endpoints_always_differ() {
        let mut rng = StdRng::seed_from_u64(7);
        let stations = LoadProfile::default().stations;
        for _ in 0..500 {
            let (start, end) = pick_route(&mut rng, &stations).unwrap();
            assert_ne!(start, end);
            assert!(stations.contains(&start));
            assert!(stations.contains(&end));
        }
    }

    #[test]
    fn test_route_needs_two_stations() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_route(&mut rng, &stations(&["shanghai"])).is_none());
        assert!(pick_route(&mut rng, &[]).is_none());
        assert_eq!(
            pick_route(&mut rng, &stations(&["shanghai", "beijing"]))
                .map(|(a, b)| a != b),
            Some(true)
        );
    }

    #[test]
    fn test_train_id_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let train_types = LoadProfile::default().train_types;
        for _ in 0..200 {
            let id = random_train_id(&mut rng, &train_types).unwrap();
            let (prefix, number) = id.split_at(1);
            assert!(train_types.iter().any(|t| t == prefix));
            let number: u32 = number.parse().unwrap();
            assert!((1000..=9999).contains(&number));
        }
    }

    #[test]
    fn test_trip_query_uses_profile_date() {
        let mut rng = StdRng::seed_from_u64(3);
        let profile = LoadProfile::default();

        let query = trip_query(&mut rng, &profile, Some("G")).unwrap();
        assert_eq!(query.departure_time, "2024-12-25");
        assert_eq!(query.train_type.as_deref(), Some("G"));
        assert_ne!(query.starting_place, query.end_place);

        assert!(trip_query(&mut rng, &profile, None).unwrap().train_type.is_none());
    }

    #[test]
    fn test_pickers_on_defaults() {
        let mut rng = StdRng::seed_from_u64(9);
        let profile = LoadProfile::default();
        assert_eq!(
            pick_user(&mut rng, &profile.users).map(|u| u.username.as_str()),
            Some("fdse_microservice")
        );
        let seat = pick_seat_type(&mut rng, &profile.seat_types).unwrap();
        assert!(seat == 2 || seat == 3);
        assert!(pick_station(&mut rng, &profile.stations).is_some());
        assert!(pick_seat_type(&mut rng, &[]).is_none());
    }
}
