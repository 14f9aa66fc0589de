mod common;

use common::*;
use rs_ful488::gpib::{MLA, MSA, MTA, UNL, UNT};
use rs_ful488::{Address, BusController, Error};

#[test]
fn addressed_talk_frames_data() {
    let bridge = MockBridge::new();
    let bus = BusController::new(bridge.clone());
    let addr = Address::new(5).unwrap();

    bus.talk("*RST\n", Some(addr), true).unwrap();

    let talked = bridge.talked();
    assert_eq!(talked.len(), 2);
    assert_eq!(talked[0].data(), b"*RS");
    assert!(!talked[0].eoi());
    assert_eq!(talked[1].data(), b"T\n");
    assert!(talked[1].eoi());

    assert_eq!(
        bridge.calls(),
        vec![
            Call::Atn(MTA),
            Call::Atn(MLA | 5),
            Call::Talk(talked[0]),
            Call::Status,
            Call::Talk(talked[1]),
            Call::Status,
            Call::Atn(UNT),
            Call::Atn(UNL),
        ]
    );
}

#[test]
fn chunk_count_and_eoi() {
    for len in 0..=10usize {
        for eoi in [true, false] {
            let bridge = MockBridge::new();
            let bus = BusController::new(bridge.clone());
            let data = vec![b'x'; len];

            bus.talk(&data, None, eoi).unwrap();

            let talked = bridge.talked();
            assert_eq!(talked.len(), len.div_ceil(3));
            assert!(talked.iter().all(|c| (1..=3).contains(&c.len())));
            let with_eoi = talked.iter().filter(|c| c.eoi()).count();
            match (eoi, talked.last()) {
                (true, Some(last)) => {
                    assert_eq!(with_eoi, 1);
                    assert!(last.eoi());
                }
                _ => assert_eq!(with_eoi, 0),
            }
        }
    }
}

#[test]
fn unaddressed_talk_sends_no_commands() {
    let bridge = MockBridge::new();
    let bus = BusController::new(bridge.clone());

    bus.talk(b"abc", None, true).unwrap();

    assert!(bridge.atn().is_empty());
    assert_eq!(bridge.talked().len(), 1);
}

#[test]
fn empty_addressed_talk_still_unaddresses() {
    let bridge = MockBridge::new();
    let bus = BusController::new(bridge.clone());

    bus.talk(b"", Some(Address::new(3).unwrap()), true).unwrap();

    assert!(bridge.talked().is_empty());
    assert_eq!(bridge.atn(), vec![MTA, MLA | 3, UNT, UNL]);
}

#[test]
fn bus_error_aborts_and_unaddresses() {
    let bridge = MockBridge::new();
    bridge.push_status(0);
    bridge.push_status(0x02);
    let bus = BusController::new(bridge.clone());

    let err = bus
        .talk(b"0123456789", Some(Address::new(7).unwrap()), true)
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::BusError { status: 0x02 })
    );
    // the remaining two chunks are never sent
    assert_eq!(bridge.talked().len(), 2);
    assert_eq!(bridge.atn(), vec![MTA, MLA | 7, UNT, UNL]);
    assert_eq!(bridge.calls().last(), Some(&Call::Atn(UNL)));
}

#[test]
fn unaddressed_bus_error_sends_no_commands() {
    let bridge = MockBridge::new();
    bridge.push_status(0x01);
    let bus = BusController::new(bridge.clone());

    let err = bus.talk(b"abcdef", None, true).unwrap_err();

    assert_eq!(
        err.downcast_ref::<Error>(),
        Some(&Error::BusError { status: 0x01 })
    );
    assert_eq!(bridge.talked().len(), 1);
    assert!(bridge.atn().is_empty());
}

#[test]
fn secondary_address_follows_primary() {
    let bridge = MockBridge::new();
    let bus = BusController::new(bridge.clone());

    bus.talk(b"a", Some(Address::with_secondary(4, 2).unwrap()), true)
        .unwrap();

    assert_eq!(bridge.atn(), vec![MTA, MLA | 4, MSA | 2, UNT, UNL]);
}

#[test]
fn failed_addressing_unaddresses() {
    let bridge = MockBridge::new();
    bridge.fail_atn(MLA | 6);
    let bus = BusController::new(bridge.clone());

    assert!(bus.talk(b"a", Some(Address::new(6).unwrap()), true).is_err());

    assert!(bridge.talked().is_empty());
    assert_eq!(bridge.atn(), vec![MTA, MLA | 6, UNT, UNL]);
}

#[test]
fn borrowed_transport() {
    let mut bridge = MockBridge::new();
    let recorder = bridge.clone();

    let bus = BusController::new(&mut bridge);
    bus.talk(b"hi", None, false).unwrap();
    drop(bus);

    assert_eq!(recorder.talked().len(), 1);
    assert!(!recorder.talked()[0].eoi());
}
