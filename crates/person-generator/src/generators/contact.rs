//! Contact info generators: email, phone or postal address.

use super::{pick, random_digits};
use rand::Rng;
use serde_json::{json, Map, Value};

const EMAIL_USERS: &[&str] = &[
    "alex", "sam", "jordan", "taylor", "casey", "morgan", "riley", "jamie", "drew", "quinn",
];

const EMAIL_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "mail.test",
    "corp.test",
];

const CALLING_CODES: &[&str] = &["+1", "+44", "+33", "+49", "+34", "+39", "+81", "+61", "+91"];

const STREET_NAMES: &[&str] = &[
    "Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Washington", "Lake", "Hill", "Park",
];

const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Blvd", "Rd", "Ln", "Dr", "Ct"];

const CITIES: &[&str] = &[
    "Springfield",
    "Riverside",
    "Franklin",
    "Greenville",
    "Bristol",
    "Clinton",
    "Fairview",
    "Salem",
    "Madison",
    "Georgetown",
];

const STATES: &[&str] = &[
    "AL", "AZ", "CA", "CO", "FL", "GA", "IL", "MA", "NY", "OH", "OR", "TX", "WA",
];

const COUNTRIES: &[&str] = &[
    "United States",
    "Canada",
    "United Kingdom",
    "France",
    "Germany",
    "Spain",
    "Italy",
    "Japan",
    "Australia",
];

/// Generate an email contact.
pub fn generate_email_contact<R: Rng>(rng: &mut R) -> Value {
    let email = format!(
        "{}{}@{}",
        pick(rng, EMAIL_USERS),
        rng.random_range(1..1000),
        pick(rng, EMAIL_DOMAINS)
    );

    json!({
        "type": "email",
        "email": email,
        "isVerified": rng.random_bool(0.5),
    })
}

/// Generate a phone contact; half of them carry an extension.
pub fn generate_phone_contact<R: Rng>(rng: &mut R) -> Value {
    let mut contact = Map::new();
    contact.insert("type".into(), json!("phone"));
    contact.insert("phoneNumber".into(), json!(random_digits(rng, 10)));
    contact.insert("countryCode".into(), json!(pick(rng, CALLING_CODES)));

    if rng.random_bool(0.5) {
        contact.insert("extension".into(), json!(random_digits(rng, 3)));
    }

    Value::Object(contact)
}

/// Generate a postal address contact.
pub fn generate_address_contact<R: Rng>(rng: &mut R) -> Value {
    let street = format!(
        "{} {} {}",
        rng.random_range(1..10000),
        pick(rng, STREET_NAMES),
        pick(rng, STREET_SUFFIXES)
    );

    json!({
        "type": "address",
        "street": street,
        "city": pick(rng, CITIES),
        "state": pick(rng, STATES),
        "postalCode": random_digits(rng, 5),
        "country": pick(rng, COUNTRIES),
    })
}

/// Generate one contact of a uniformly chosen kind.
pub fn generate_contact_info<R: Rng>(rng: &mut R) -> Value {
    match rng.random_range(0..3) {
        0 => generate_email_contact(rng),
        1 => generate_phone_contact(rng),
        _ => generate_address_contact(rng),
    }
}
