use super::*;
use crate::PhotostripError;

struct Scripted {
    calls: usize,
    answer: fn(usize) -> PhotostripResult<Option<Place>>,
}

impl ReverseGeocoder for Scripted {
    fn reverse(&mut self, _coords: Coordinates) -> PhotostripResult<Option<Place>> {
        self.calls += 1;
        (self.answer)(self.calls)
    }
}

fn lisbon(_: usize) -> PhotostripResult<Option<Place>> {
    Ok(Some(Place {
        city: Some("Lisbon".to_string()),
        country: Some("Portugal".to_string()),
    }))
}

#[test]
fn keys_round_to_four_decimals() {
    let a = CoordinateKey::from(Coordinates::new(38.722_21, -9.139_34));
    let b = CoordinateKey::from(Coordinates::new(38.722_249, -9.139_301));
    let c = CoordinateKey::from(Coordinates::new(38.7224, -9.1393));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_string(), "38.7222,-9.1393");
}

#[test]
fn place_labels() {
    let both = Place {
        city: Some("Porto".to_string()),
        country: Some("Portugal".to_string()),
    };
    assert_eq!(both.label().as_deref(), Some("Porto, Portugal"));
    let country = Place {
        city: Some("  ".to_string()),
        country: Some("Chile".to_string()),
    };
    assert_eq!(country.label().as_deref(), Some("Chile"));
    assert_eq!(Place::default().label(), None);
}

#[test]
fn resolver_caches_hits_by_rounded_key() {
    let mut r = LocationResolver::new(Scripted {
        calls: 0,
        answer: lisbon,
    });
    let here = Coordinates::new(38.72221, -9.13934);
    assert_eq!(r.resolve(here).as_deref(), Some("Lisbon, Portugal"));
    assert_eq!(
        r.resolve(Coordinates::new(38.722_24, -9.139_31)).as_deref(),
        Some("Lisbon, Portugal")
    );
    assert_eq!(r.geocoder.calls, 1);
    assert_eq!(r.cache().len(), 1);

    r.cache_mut().clear();
    r.resolve(here);
    assert_eq!(r.geocoder.calls, 2);
}

#[test]
fn failures_are_not_cached() {
    fn flaky(call: usize) -> PhotostripResult<Option<Place>> {
        match call {
            1 => Err(PhotostripError::validation("offline")),
            2 => Ok(None),
            _ => lisbon(call),
        }
    }
    let mut r = LocationResolver::new(Scripted {
        calls: 0,
        answer: flaky,
    });
    let here = Coordinates::new(1.0, 2.0);
    assert_eq!(r.resolve(here), None);
    assert_eq!(r.resolve(here), None);
    assert!(r.cache().is_empty());
    assert_eq!(r.resolve(here).as_deref(), Some("Lisbon, Portugal"));
    assert_eq!(r.geocoder.calls, 3);
}
