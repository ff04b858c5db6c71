use super::*;

#[test]
fn decode_weather_update_reads_robot_temperature_and_message() {
    let raw = r#"{"type":"weather_update","robot":"Bogotá","data":{"temperature":15},"message":"🏔️ 15°C"}"#;
    let InboundPayload::WeatherUpdate(update) = decode(raw) else {
        panic!("expected weather update");
    };
    assert_eq!(update.robot, "Bogotá");
    assert!((update.data.temperature - 15.0).abs() < f64::EPSILON);
    assert_eq!(update.message, "🏔️ 15°C");
    assert_eq!(update.data.city, None);
}

#[test]
fn decode_weather_update_keeps_optional_reading_fields() {
    let raw = serde_json::json!({
        "type": "weather_update",
        "robot": "robot_medellin",
        "data": {
            "city": "medellin",
            "name": "Medellín",
            "temperature": 24,
            "humidity": 61,
            "description": "Parcialmente nublado",
            "time": "10:15:00",
            "emoji": "🌺",
            "source": "Datos simulados",
            "real_data": false,
            "altitude": 1495
        },
        "message": "🌺 Robot Medellín: 24°C"
    })
    .to_string();

    let InboundPayload::WeatherUpdate(update) = decode(&raw) else {
        panic!("expected weather update");
    };
    assert_eq!(update.data.name.as_deref(), Some("Medellín"));
    assert_eq!(update.data.real_data, Some(false));
    assert_eq!(update.data.altitude, Some(1495.0));
}

#[test]
fn decode_chat_response_and_connection_notice() {
    let chat = decode(r#"{"type":"chat_response","message":"hola","timestamp":"2024-01-01T00:00:00"}"#);
    assert_eq!(chat, InboundPayload::ChatResponse { message: "hola".to_owned() });
    assert_eq!(chat.kind(), Some("chat_response"));

    let notice = decode(r#"{"type":"connection","message":"welcome"}"#);
    assert_eq!(notice, InboundPayload::ConnectionNotice { message: "welcome".to_owned() });
    assert_eq!(notice.kind(), Some("connection"));
}

#[test]
fn decode_unknown_type_falls_back_with_message_field() {
    let raw = r#"{"type":"heartbeat","message":"ping"}"#;
    assert_eq!(
        decode(raw),
        InboundPayload::UnrecognizedJson { message: Some("ping".to_owned()), raw: raw.to_owned() }
    );
}

#[test]
fn decode_json_without_message_keeps_raw_only() {
    let raw = r#"{"status":"ok"}"#;
    let payload = decode(raw);
    assert_eq!(payload, InboundPayload::UnrecognizedJson { message: None, raw: raw.to_owned() });
    assert_eq!(payload.kind(), None);
}

#[test]
fn decode_empty_or_non_string_message_is_ignored() {
    let empty = decode(r#"{"message":""}"#);
    assert!(matches!(empty, InboundPayload::UnrecognizedJson { message: None, .. }));

    let numeric = decode(r#"{"message":5}"#);
    assert!(matches!(numeric, InboundPayload::UnrecognizedJson { message: None, .. }));
}

#[test]
fn decode_known_type_with_malformed_body_is_text() {
    let raw = r#"{"type":"weather_update","robot":"Bogotá","message":"no data"}"#;
    assert_eq!(decode(raw), InboundPayload::Text(raw.to_owned()));

    let raw = r#"{"type":"chat_response","message":7}"#;
    assert_eq!(decode(raw), InboundPayload::Text(raw.to_owned()));
}

#[test]
fn decode_unknown_or_non_string_type_is_unrecognized() {
    let raw = r#"{"type":"weather","message":"hola"}"#;
    assert_eq!(decode(raw), InboundPayload::UnrecognizedJson { message: Some("hola".to_owned()), raw: raw.to_owned() });
    assert!(matches!(decode(r#"{"type":1}"#), InboundPayload::UnrecognizedJson { message: None, .. }));
}

#[test]
fn decode_non_object_json_is_unrecognized() {
    assert!(matches!(decode("42"), InboundPayload::UnrecognizedJson { message: None, .. }));
    assert!(matches!(decode("[1,2]"), InboundPayload::UnrecognizedJson { message: None, .. }));
}

#[test]
fn decode_plain_text_is_text_variant() {
    assert_eq!(decode("Robot Medellín: 22°C"), InboundPayload::Text("Robot Medellín: 22°C".to_owned()));
    assert_eq!(decode("{not json"), InboundPayload::Text("{not json".to_owned()));
    assert_eq!(decode(""), InboundPayload::Text(String::new()));
}

#[test]
fn is_robot_text_matches_city_labels_only() {
    assert!(is_robot_text("🏔️ Robot Bogotá: 15°C - 10:00"));
    assert!(is_robot_text("Robot Medellín: 22°C"));
    assert!(!is_robot_text("Robot Cali: 30°C"));
    assert!(!is_robot_text("robot bogotá"));
}
