//! End-to-end tests: chunk writes in, router deliveries out

use std::sync::Arc;

use bytes::Bytes;
use extmsg_codec::{split_into_chunks, ChunkError, FrameError, MessageFrame};
use extmsg_push_service::{EndpointRegistry, EndpointSettings, PushMessageEndpoint, WriteOutcome};
use extmsg_sink::test_utils::{CollectorRouter, FailingRouter};
use extmsg_sink::{ChannelRouter, DeliveryError, RouterAddressing};
use proptest::prelude::*;

fn chunks_for(counter: u8, source: &str, destination: &str, payload: &[u8]) -> Vec<Vec<u8>> {
    let mut message = Vec::new();
    message.extend_from_slice(source.as_bytes());
    message.push(b'\n');
    message.extend_from_slice(destination.as_bytes());
    message.push(b'\n');
    message.extend_from_slice(payload);
    split_into_chunks(counter, &message, 20).expect("Failed to chunk message")
}

fn write_all<R: extmsg_sink::MessageRouter>(
    endpoint: &mut PushMessageEndpoint<R>,
    chunks: &[Vec<u8>],
) -> Vec<WriteOutcome> {
    chunks.iter().map(|chunk| endpoint.write_value(chunk)).collect()
}

#[test]
fn test_message_forwarded_once_complete() {
    let router = Arc::new(CollectorRouter::new());
    let mut endpoint = PushMessageEndpoint::new(router.clone());

    let chunks = chunks_for(0, "com.example.App", "weather", b"sunny with a chance of rain");
    let outcomes = write_all(&mut endpoint, &chunks);

    let (last, rest) = outcomes.split_last().unwrap();
    assert!(rest.iter().all(|o| *o == WriteOutcome::Pending));
    assert_eq!(
        *last,
        WriteOutcome::Delivered {
            source: "com.example.App".to_string(),
            destination: "weather".to_string()
        }
    );

    let deliveries = router.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].destination, "weather");
    assert_eq!(deliveries[0].source, "com.example.App");
    assert_eq!(&deliveries[0].payload[..], b"sunny with a chance of rain");
}

#[test]
fn test_counter_change_discards_partial_message() {
    let router = Arc::new(CollectorRouter::new());
    let mut endpoint = PushMessageEndpoint::new(router.clone());

    let message_a = chunks_for(5, "app", "first", &[b'A'; 60]);
    let message_b = chunks_for(6, "app", "second", &[b'B'; 60]);

    write_all(&mut endpoint, &message_a[..2]);
    write_all(&mut endpoint, &message_b);

    let deliveries = router.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].destination, "second");
    assert!(deliveries[0].payload.iter().all(|&b| b == b'B'));
}

#[test]
fn test_invalid_frames_are_not_forwarded() {
    let router = Arc::new(CollectorRouter::new());
    let mut endpoint = PushMessageEndpoint::new(router.clone());

    let reserved = write_all(&mut endpoint, &chunks_for(1, "app", "interfacesFoo", b"x"));
    assert_eq!(
        reserved.last(),
        Some(&WriteOutcome::FrameRejected(FrameError::ReservedDestination {
            value: "interfacesFoo".to_string(),
            prefix: "interfaces".to_string()
        }))
    );

    let dotted = write_all(&mut endpoint, &chunks_for(2, "app", "foo.bar", b"x"));
    assert!(matches!(
        dotted.last(),
        Some(WriteOutcome::FrameRejected(FrameError::InvalidDestination { .. }))
    ));

    assert_eq!(router.delivery_count(), 0);

    // The endpoint keeps working after a rejected frame
    let ok = write_all(&mut endpoint, &chunks_for(3, "app", "foo", b"x"));
    assert!(ok.last().unwrap().is_delivered());
}

#[test]
fn test_undersized_chunk_clears_state() {
    let router = Arc::new(CollectorRouter::new());
    let mut endpoint = PushMessageEndpoint::new(router.clone());
    let chunks = chunks_for(9, "app", "dest", &[1u8; 40]);

    endpoint.write_value(&chunks[0]);
    assert!(endpoint.reassembler().is_in_progress());

    assert_eq!(
        endpoint.write_value(&[9, 0, 0, 0]),
        WriteOutcome::ChunkRejected(ChunkError::TooShort { need: 5, got: 4 })
    );
    assert!(!endpoint.reassembler().is_in_progress());
}

#[test]
fn test_delivery_failure_does_not_affect_next_message() {
    let router = Arc::new(CollectorRouter::new());
    let mut endpoint = PushMessageEndpoint::new(router.clone());

    router.fail_next_delivery();
    let failed = write_all(&mut endpoint, &chunks_for(0, "app", "weather", b"first"));
    assert!(matches!(
        failed.last(),
        Some(WriteOutcome::DeliveryFailed { destination, error: DeliveryError::Rejected { .. } })
            if destination == "weather"
    ));
    assert!(!endpoint.reassembler().is_in_progress());

    let second = write_all(&mut endpoint, &chunks_for(1, "app", "weather", b"second"));
    assert!(second.last().unwrap().is_delivered());

    assert_eq!(router.failed_count(), 1);
    assert_eq!(router.delivery_count(), 1);
    assert_eq!(&router.deliveries()[0].payload[..], b"second");
}

#[test]
fn test_failing_router_is_called_once_per_message() {
    let router = Arc::new(FailingRouter::new("service unknown"));
    let mut endpoint = PushMessageEndpoint::new(router.clone());

    for counter in 0..3 {
        write_all(&mut endpoint, &chunks_for(counter, "app", "weather", b"x"));
    }
    assert_eq!(router.attempts(), 3);
}

#[test]
fn test_interleaved_connections_reassemble_independently() {
    let router = Arc::new(CollectorRouter::new());
    let mut registry = EndpointRegistry::new(router.clone(), EndpointSettings::default());

    let first = chunks_for(4, "one.app", "alpha", &[b'1'; 70]);
    let second = chunks_for(4, "two.app", "beta", &[b'2'; 45]);
    let longest = first.len().max(second.len());

    for i in 0..longest {
        if let Some(chunk) = first.get(i) {
            registry.write_value(1, chunk);
        }
        if let Some(chunk) = second.get(i) {
            registry.write_value(2, chunk);
        }
    }

    let mut deliveries = router.deliveries();
    deliveries.sort_by(|a, b| a.destination.cmp(&b.destination));
    assert_eq!(deliveries.len(), 2);
    assert_eq!(deliveries[0].destination, "alpha");
    assert_eq!(deliveries[0].payload, Bytes::from(vec![b'1'; 70]));
    assert_eq!(deliveries[1].destination, "beta");
    assert_eq!(deliveries[1].payload, Bytes::from(vec![b'2'; 45]));
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn test_channel_router_hands_off_to_delivery_task() {
    let (router, mut receiver) = ChannelRouter::new(RouterAddressing::default(), 4);
    let mut registry = EndpointRegistry::new(router, EndpointSettings::default());

    for chunk in chunks_for(0, "com.example.App", "calendar", b"meeting at 10") {
        registry.write_value(0, &chunk);
    }
    drop(registry);

    let delivery = receiver.recv().await.expect("Expected a delivery");
    assert_eq!(delivery.address.service, "org.extmsg.ExternalAppMessage.calendar");
    assert_eq!(delivery.source, "com.example.App");
    assert_eq!(&delivery.payload[..], b"meeting at 10");
    assert!(receiver.recv().await.is_none());
}

#[test]
fn test_full_channel_reports_busy() {
    let (router, _receiver) = ChannelRouter::new(RouterAddressing::default(), 1);
    let mut endpoint = PushMessageEndpoint::new(router);

    let first = write_all(&mut endpoint, &chunks_for(0, "app", "weather", b"a"));
    assert!(first.last().unwrap().is_delivered());

    let second = write_all(&mut endpoint, &chunks_for(1, "app", "weather", b"b"));
    assert!(matches!(
        second.last(),
        Some(WriteOutcome::DeliveryFailed { error: DeliveryError::Busy { .. }, .. })
    ));
}

proptest! {
    #[test]
    fn prop_any_chunk_size_delivers_exact_payload(
        payload in proptest::collection::vec(any::<u8>(), 0..1024),
        max_chunk_len in 6usize..128,
        counter in any::<u8>(),
    ) {
        let frame = MessageFrame::new("com.example.App", "weather", payload.clone()).unwrap();
        let router = Arc::new(CollectorRouter::new());
        let mut endpoint = PushMessageEndpoint::new(router.clone());

        for chunk in split_into_chunks(counter, &frame.encode(), max_chunk_len).unwrap() {
            endpoint.write_value(&chunk);
        }

        prop_assert_eq!(router.delivery_count(), 1);
        prop_assert_eq!(&router.deliveries()[0].payload[..], &payload[..]);
    }

    #[test]
    fn prop_arbitrary_writes_never_panic(
        writes in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..40), 0..30),
    ) {
        let mut endpoint = PushMessageEndpoint::new(Arc::new(CollectorRouter::new()));
        for write in &writes {
            endpoint.write_value(write);
        }
    }
}
