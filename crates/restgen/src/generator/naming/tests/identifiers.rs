use crate::generator::naming::identifiers::{
  sanitize, suffix_member_collision, to_field_name, to_member_name, to_method_name, to_type_name,
};

#[test]
fn test_sanitize_strips_invalid_characters() {
  assert_eq!(sanitize("pet store!"), "pet_store");
  assert_eq!(sanitize("__already__ugly__"), "already_ugly");
  assert_eq!(sanitize(""), "");
}

#[test]
fn test_type_name_casing() {
  assert_eq!(to_type_name("pet-store"), "PetStore");
  assert_eq!(to_type_name("listPetsResponse"), "ListPetsResponse");
  assert_eq!(to_type_name(""), "Unnamed");
  assert!(to_type_name("2fa").starts_with("T2"));
}

#[test]
fn test_type_name_reserved_gets_raw_prefix() {
  assert_eq!(to_type_name("Vec"), "r#Vec");
}

#[test]
fn test_method_name_keywords_are_escaped() {
  assert_eq!(to_method_name("type"), "r#type");
  assert_eq!(to_method_name("listPets"), "list_pets");
  assert_eq!(to_method_name("self"), "self_");
}

#[test]
fn test_field_name_digit_prefix() {
  assert_eq!(to_field_name("2ndValue"), "_2nd_value");
}

#[test]
fn test_member_name_prefers_declared() {
  assert_eq!(to_member_name(Some("Ok"), "200"), "Ok");
  assert_eq!(to_member_name(None, "in-progress"), "InProgress");
  assert_eq!(to_member_name(None, "-42"), "Negative42");
  assert_eq!(to_member_name(None, "404"), "N404");
}

#[test]
fn test_member_collision_suffixes_are_positional() {
  assert_eq!(suffix_member_collision("Running", 0), "Running");
  assert_eq!(suffix_member_collision("Running", 1), "Running_1");
  assert_eq!(suffix_member_collision("Running", 2), "Running_2");
}
