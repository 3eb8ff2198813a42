//! Float helpers for coordinates, sizes and weights.
//!
//! JSON has no representation for NaN or infinities, so both directions
//! reject them instead of letting `serde_json` write `null`.

use serde::{Deserialize, Deserializer, Serializer};

pub fn ser_opt_finite<S>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let Some(v) = *v else {
        return s.serialize_none();
    };
    if !v.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "non-finite float not allowed in JSON: {v}"
        )));
    }
    // -0.0 -> 0.0
    s.serialize_f64(if v == 0.0 { 0.0 } else { v })
}

pub fn de_opt_finite<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    // Integer JSON numbers are coerced to f64 here.
    match Option::<f64>::deserialize(d)? {
        Some(x) if !x.is_finite() => Err(serde::de::Error::custom(format!(
            "non-finite float not allowed in JSON: {x}"
        ))),
        other => Ok(other),
    }
}
