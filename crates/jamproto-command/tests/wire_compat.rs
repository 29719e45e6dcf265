use ciborium::Value;
use jamproto_command::{ArgKind, Argument, Command, CommandError, Signature, NO_ACTIVITY, RPC};

fn text(s: &str) -> Value {
    Value::Text(s.to_owned())
}

fn sample_arguments() -> Vec<Argument> {
    vec![
        Argument::from("hello"),
        Argument::Int(42),
        Argument::Int(-42),
        Argument::Int(i32::MAX),
        Argument::Int(i32::MIN),
        Argument::Double(std::f64::consts::PI),
        Argument::Double(-0.1),
        Argument::from(vec![0u8, 1, 0, 255]),
        Argument::from(""),
        Argument::from(Vec::<u8>::new()),
    ]
}

#[test]
fn roundtrip_preserves_every_field() {
    let original = Command::from_arguments(
        "REGISTER",
        "device",
        "temperature-logger",
        "18446744073709551615",
        sample_arguments(),
    )
    .expect("build should succeed");

    let sig = original.signature().to_string();
    assert_eq!(sig, "siiiiddnsn");

    let decoded = Command::decode(original.as_bytes(), Some(&sig)).expect("decode should succeed");
    assert_eq!(decoded, original);
    assert_eq!(decoded.name(), "REGISTER");
    assert_eq!(decoded.option(), "device");
    assert_eq!(decoded.activity_name(), "temperature-logger");
    assert_eq!(decoded.activity_id(), "18446744073709551615");
    assert_eq!(decoded.arguments(), sample_arguments().as_slice());
}

#[test]
fn roundtrip_without_signature() {
    let original = Command::builder(RPC).string("x").double(1e300).build().unwrap();
    let decoded = Command::decode(original.as_bytes(), None).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn signed_integers_share_magnitude() {
    let pos = Command::with_format(RPC, "", "", NO_ACTIVITY, "i", [Argument::Int(5)]).unwrap();
    let neg = Command::with_format(RPC, "", "", NO_ACTIVITY, "i", [Argument::Int(-5)]).unwrap();

    let pos_last = *pos.as_bytes().last().unwrap();
    let neg_last = *neg.as_bytes().last().unwrap();
    assert_eq!(pos_last & 0x1f, neg_last & 0x1f);
    assert_eq!(pos_last >> 5, 0);
    assert_eq!(neg_last >> 5, 1);

    let pos = Command::decode(pos.as_bytes(), Some("i")).unwrap();
    let neg = Command::decode(neg.as_bytes(), Some("i")).unwrap();
    assert_eq!(pos.arguments(), &[Argument::Int(5)]);
    assert_eq!(neg.arguments(), &[Argument::Int(-5)]);
}

#[test]
fn byte_blob_with_zero_keeps_length() {
    let blob = vec![b'a', 0, b'b', 0, 0];
    let cmd = Command::builder(RPC).bytes(blob.clone()).build().unwrap();
    let decoded = Command::decode(cmd.as_bytes(), Some("n")).unwrap();
    assert_eq!(decoded.argument(0).unwrap().as_bytes(), Some(blob.as_slice()));
}

#[test]
fn scenario_rpc_hello_42() {
    let cmd = Command::with_format(
        "RPC",
        "",
        "act1",
        "0",
        "si",
        [Argument::from("hello"), Argument::from(42)],
    )
    .unwrap();
    let decoded = Command::decode(cmd.as_bytes(), Some("si")).unwrap();
    assert_eq!(
        decoded.arguments(),
        &[Argument::Str("hello".into()), Argument::Int(42)]
    );
    assert_eq!(decoded.activity_id(), "0");
}

#[test]
fn arity_mismatch_for_every_other_length() {
    let cmd = Command::builder(RPC).int(1).int(2).int(3).build().unwrap();
    for fmt in ["", "i", "ii", "iiii", "iiiii"] {
        let err = Command::decode(cmd.as_bytes(), Some(fmt)).unwrap_err();
        assert!(
            matches!(err, CommandError::ArityMismatch { found: 3, .. }),
            "fmt {fmt:?} gave {err:?}"
        );
    }
    assert!(Command::decode(cmd.as_bytes(), Some("iii")).is_ok());
}

#[test]
fn every_key_permutation_is_rejected() {
    let keys = ["cmd", "opt", "actname", "actid", "args"];
    let values = [text("RPC"), text(""), text(""), text("0"), Value::Array(vec![])];

    // Rotations and a pairwise swap of each adjacent position.
    let mut orders: Vec<Vec<usize>> = (1..5)
        .map(|shift| (0..5).map(|i| (i + shift) % 5).collect())
        .collect();
    for i in 0..4 {
        let mut order: Vec<usize> = (0..5).collect();
        order.swap(i, i + 1);
        orders.push(order);
    }

    for order in orders {
        let entries = order
            .iter()
            .map(|&i| (text(keys[i]), values[i].clone()))
            .collect();
        let mut buf = Vec::new();
        ciborium::into_writer(&Value::Map(entries), &mut buf).unwrap();
        let err = Command::decode(&buf, None).unwrap_err();
        assert!(
            matches!(err, CommandError::SchemaMismatch { .. }),
            "order {order:?} gave {err:?}"
        );
    }
}

#[test]
fn integer_against_string_signature() {
    let cmd = Command::builder(RPC).string("a").int(9).build().unwrap();
    let err = Command::decode(cmd.as_bytes(), Some("ss")).unwrap_err();
    assert!(matches!(
        err,
        CommandError::TypeMismatch {
            index: 1,
            expected: ArgKind::Str,
            found: ArgKind::Int
        }
    ));
}

#[test]
fn four_entry_map_is_rejected() {
    let entries = vec![
        (text("cmd"), text("RPC")),
        (text("opt"), text("")),
        (text("actname"), text("")),
        (text("actid"), text("0")),
    ];
    let mut buf = Vec::new();
    ciborium::into_writer(&Value::Map(entries), &mut buf).unwrap();
    let err = Command::decode(&buf, None).unwrap_err();
    assert!(matches!(err, CommandError::FieldCountMismatch { found: 4 }));
}

#[test]
fn accepts_indefinite_length_args_from_foreign_producers() {
    let mut buf = vec![0xa5];
    buf.extend_from_slice(b"\x63cmd\x64PING");
    buf.extend_from_slice(b"\x63opt\x60");
    buf.extend_from_slice(b"\x67actname\x60");
    buf.extend_from_slice(b"\x65actid\x610");
    buf.extend_from_slice(b"\x64args\x9f\x01\x61x\xff");

    let cmd = Command::decode(&buf, Some("is")).unwrap();
    assert_eq!(cmd.name(), "PING");
    assert_eq!(cmd.arguments(), &[Argument::Int(1), Argument::from("x")]);
    assert_eq!(cmd.as_bytes(), buf.as_slice());

    // Same command, but this writer frames `args` with a definite header.
    let ours = Command::builder("PING").int(1).string("x").build().unwrap();
    assert_eq!(ours, cmd);
    assert_ne!(ours.as_bytes(), buf.as_slice());
    assert!(ours.as_bytes().ends_with(b"\x64args\x82\x01\x61x"));
}

#[test]
fn decoded_signature_parses_back() {
    let cmd = Command::builder(RPC).double(1.0).bytes(vec![9u8]).build().unwrap();
    let sig: Signature = cmd.signature().to_string().parse().unwrap();
    assert_eq!(sig, cmd.signature());
}

#[test]
fn truncated_buffers_never_panic() {
    let cmd = Command::from_arguments(RPC, "o", "a", "1", sample_arguments()).unwrap();
    let bytes = cmd.as_bytes();
    for len in 0..bytes.len() {
        let err = Command::decode(&bytes[..len], None).unwrap_err();
        assert!(
            matches!(err, CommandError::MalformedBuffer(_)),
            "prefix {len} gave {err:?}"
        );
    }
}
