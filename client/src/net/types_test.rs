use super::*;

// =============================================================
// Helpers
// =============================================================

fn make_profile() -> UserProfile {
    UserProfile {
        user_id: "u-1".to_owned(),
        email: "a@x.com".to_owned(),
        phone_number: Some("555-0100".to_owned()),
        user_role: UserRole::Customer,
        first_name: None,
        last_name: Some("Green".to_owned()),
        profile_image_url: None,
        street_address: None,
        city: Some("Austin".to_owned()),
        state: None,
        zip_code: None,
        account_status: AccountStatus::Active,
        created_at: "2024-05-01T00:00:00Z".to_owned(),
        updated_at: "2024-05-01T00:00:00Z".to_owned(),
        deleted_at: None,
    }
}

// =============================================================
// Enums
// =============================================================

#[test]
fn user_role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    assert_eq!(serde_json::to_string(&UserRole::Customer).unwrap(), "\"customer\"");
    assert_eq!(serde_json::to_string(&UserRole::Landscaper).unwrap(), "\"landscaper\"");
}

#[test]
fn user_role_parse_matches_wire_names() {
    for role in UserRole::ALL {
        assert_eq!(UserRole::parse(role.as_str()), Some(role));
    }
    assert_eq!(UserRole::parse("owner"), None);
    assert_eq!(UserRole::parse("Admin"), None);
}

#[test]
fn account_status_defaults_to_active() {
    assert_eq!(AccountStatus::default(), AccountStatus::Active);
    assert_eq!(serde_json::to_string(&AccountStatus::Suspended).unwrap(), "\"suspended\"");
}

// =============================================================
// UserProfile
// =============================================================

#[test]
fn profile_deserializes_backend_row() {
    let row = serde_json::json!({
        "user_id": "u-9",
        "email": "l@x.com",
        "phone_number": null,
        "user_role": "landscaper",
        "first_name": "Lee",
        "last_name": null,
        "profile_image_url": null,
        "street_address": null,
        "city": null,
        "state": null,
        "zip_code": null,
        "account_status": "inactive",
        "created_at": "2024-05-01T00:00:00Z",
        "updated_at": "2024-05-02T00:00:00Z",
        "deleted_at": null
    });
    let profile: UserProfile = serde_json::from_value(row).unwrap();
    assert_eq!(profile.user_role, UserRole::Landscaper);
    assert_eq!(profile.account_status, AccountStatus::Inactive);
    assert_eq!(profile.first_name.as_deref(), Some("Lee"));
    assert_eq!(profile.identity(), Identity { id: "u-9".to_owned(), email: "l@x.com".to_owned() });
}

#[test]
fn apply_merges_only_present_fields() {
    let mut profile = make_profile();
    let before = profile.clone();
    let changes = ProfileChanges { first_name: Some(Some("A".to_owned())), ..ProfileChanges::default() };

    profile.apply(&changes);

    assert_eq!(profile.first_name.as_deref(), Some("A"));
    assert_eq!(profile.last_name, before.last_name);
    assert_eq!(profile.city, before.city);
    assert_eq!(profile.phone_number, before.phone_number);
    assert_eq!(profile.user_role, before.user_role);
}

#[test]
fn apply_can_null_a_column() {
    let mut profile = make_profile();
    profile.apply(&ProfileChanges { phone_number: Some(None), ..ProfileChanges::default() });
    assert_eq!(profile.phone_number, None);
}

// =============================================================
// NewProfile / ProfileChanges
// =============================================================

#[test]
fn new_profile_defaults_are_blank_and_active() {
    let identity = Identity { id: "u-2".to_owned(), email: "b@x.com".to_owned() };
    let row = NewProfile::for_identity(&identity, UserRole::Admin);
    assert_eq!(row.user_id, "u-2");
    assert_eq!(row.email, "b@x.com");
    assert_eq!(row.user_role, UserRole::Admin);
    assert_eq!(row.account_status, AccountStatus::Active);
    assert!(row.phone_number.is_none());
    assert!(row.street_address.is_none());
    assert!(row.zip_code.is_none());
}

#[test]
fn new_profile_serializes_nulls_explicitly() {
    let identity = Identity { id: "u-2".to_owned(), email: "b@x.com".to_owned() };
    let json = serde_json::to_value(NewProfile::for_identity(&identity, UserRole::Customer)).unwrap();
    assert_eq!(json["first_name"], serde_json::Value::Null);
    assert_eq!(json["account_status"], "active");
    assert!(json.get("created_at").is_none());
}

#[test]
fn profile_changes_serialize_only_present_fields() {
    let changes = ProfileChanges {
        first_name: Some(Some("A".to_owned())),
        zip_code: Some(None),
        ..ProfileChanges::default()
    };
    let json = serde_json::to_value(&changes).unwrap();
    assert_eq!(json, serde_json::json!({ "first_name": "A", "zip_code": null }));
}

#[test]
fn profile_changes_read_back_keeps_explicit_null() {
    let changes = ProfileChanges { zip_code: Some(None), city: Some(Some("Boise".to_owned())), ..ProfileChanges::default() };
    let json = serde_json::to_string(&changes).unwrap();

    let back: ProfileChanges = serde_json::from_str(&json).unwrap();

    assert_eq!(back, changes);
    assert_eq!(back.zip_code, Some(None));
    assert_eq!(back.state, None);
}

#[test]
fn profile_changes_empty_detection() {
    assert!(ProfileChanges::default().is_empty());
    assert!(!ProfileChanges { city: Some(None), ..ProfileChanges::default() }.is_empty());
}
