use serde::Serialize;

use crate::error::DrugInteractError;

pub(crate) fn to_pretty<T: Serialize>(value: &T) -> Result<String, DrugInteractError> {
    Ok(serde_json::to_string_pretty(value)?)
}
