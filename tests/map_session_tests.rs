mod common;

use common::{event, leg, MockEventSource, MockGeocoder, MockRouting, BUCHAREST};
use localpulse::components::events::EventsHandle;
use localpulse::components::geocoding::GeocodingService;
use localpulse::components::map::MapSession;
use localpulse::components::redis_service::RedisActorHandle;
use localpulse::components::travel::{TravelEstimator, TravelMode, TravelSource};
use localpulse::utils::geo::{haversine_km, Coordinates};
use std::sync::Arc;
use std::time::Duration;

fn near() -> Coordinates {
    Coordinates::new(44.4350, 26.1000)
}

fn far() -> Coordinates {
    Coordinates::new(44.5000, 26.2000)
}

fn session_with(source: MockEventSource, routing: MockRouting) -> (MapSession, Arc<MockGeocoder>) {
    let geocoder = Arc::new(MockGeocoder::new().with_place("Bucharest", Some(BUCHAREST)));
    let session = MapSession::new(
        EventsHandle::new(Arc::new(source), RedisActorHandle::empty()),
        GeocodingService::new(geocoder.clone(), 16),
        TravelEstimator::new(Arc::new(routing)),
    );
    (session, geocoder)
}

#[tokio::test]
async fn test_search_city_geocodes_and_loads() {
    let source = MockEventSource::with_events(vec![event("a", Some(near()))]);
    let (session, geocoder) = session_with(source, MockRouting::unavailable());

    assert_eq!(session.events_state().borrow().ready().map(Vec::len), Some(0));

    session.search_city("Bucharest").await;
    assert_eq!(*session.searched_city().borrow(), "Bucharest");
    assert_eq!(*session.geocoded_location().borrow(), Some(BUCHAREST));
    assert_eq!(session.events_state().borrow().ready().map(Vec::len), Some(1));

    session.search_city("Bucharest").await;
    assert_eq!(geocoder.calls(), 1);
}

#[tokio::test]
async fn test_unknown_city_still_searches_by_name() {
    let source = MockEventSource::with_events(vec![event("a", None)]);
    let (session, _) = session_with(source, MockRouting::unavailable());

    session.search_city("Atlantis").await;
    assert_eq!(*session.geocoded_location().borrow(), None);
    assert_eq!(session.events_state().borrow().ready().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_select_event_computes_travel_info() {
    let routing = MockRouting::unavailable()
        .with_leg(TravelMode::Driving, leg(1200, "1.2 km", 300, "5 mins"))
        .with_leg(TravelMode::Walking, leg(1100, "1.1 km", 900, "15 mins"));
    let (session, _) = session_with(MockEventSource::with_events(Vec::new()), routing);

    // No location yet, so no travel info
    session.select_event(event("a", Some(near()))).await;
    assert!(session.travel_info().borrow().is_none());

    session.set_current_location(BUCHAREST).await;
    let info = session.travel_info().borrow().clone().expect("recomputed on location fix");
    assert_eq!(info.source, TravelSource::Routed);
    assert_eq!(info.car_time_minutes, 5);

    session.clear_selection();
    assert!(session.selected_event().borrow().is_none());
    assert!(session.travel_info().borrow().is_none());
}

#[tokio::test]
async fn test_event_without_location_has_no_travel_info() {
    let (session, _) = session_with(
        MockEventSource::with_events(Vec::new()),
        MockRouting::unavailable(),
    );
    session.set_current_location(BUCHAREST).await;

    session.select_event(event("a", None)).await;
    assert!(session.travel_info().borrow().is_none());
}

#[tokio::test]
async fn test_stale_travel_info_is_discarded() {
    let routing = MockRouting::unavailable().with_delay(Duration::from_millis(100));
    let (session, _) = session_with(MockEventSource::with_events(Vec::new()), routing);
    let session = Arc::new(session);
    session.set_current_location(BUCHAREST).await;

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.select_event(event("a", Some(far()))).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    session.clear_selection();
    pending.await.expect("selection task");

    assert!(session.selected_event().borrow().is_none());
    assert!(session.travel_info().borrow().is_none());
}

#[tokio::test]
async fn test_estimate_for_older_location_does_not_win() {
    let routing = MockRouting::unavailable().with_slow_origin(BUCHAREST, Duration::from_millis(100));
    let (session, _) = session_with(MockEventSource::with_events(Vec::new()), routing);
    let session = Arc::new(session);
    session.set_current_location(BUCHAREST).await;

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.select_event(event("a", Some(far()))).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Same event, newer fix; this estimate returns first
    session.set_current_location(near()).await;
    pending.await.expect("selection task");

    let info = session.travel_info().borrow().clone().expect("travel info");
    assert!((info.distance_km - haversine_km(&near(), &far())).abs() < 1e-9);
}

#[tokio::test]
async fn test_nearby_events_sorted_by_distance() {
    let source = MockEventSource::with_events(vec![
        event("far", Some(far())),
        event("near", Some(near())),
        event("nowhere", None),
    ]);
    let (session, _) = session_with(source, MockRouting::unavailable());

    session.search_city("Bucharest").await;
    // Distances need a location fix
    assert!(session.nearby_events(50.0).is_empty());

    session.set_current_location(BUCHAREST).await;
    let nearby = session.nearby_events(50.0);
    let ids: Vec<&str> = nearby.iter().map(|(e, _)| e.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "far"]);
    assert!((nearby[0].1 - haversine_km(&BUCHAREST, &near())).abs() < 1e-9);

    let close = session.nearby_events(2.0);
    assert_eq!(close.len(), 1);
    assert_eq!(close[0].0.id, "near");
}
