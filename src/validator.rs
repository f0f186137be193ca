use crate::properties::ExtractedProperties;
use crate::{Result, VcardError, CANONICAL_NAME, STRUCTURED_NAME};
use std::collections::BTreeMap;

/// Apply the name rule to a record's extracted properties and return the
/// final attribute map.
///
/// - nothing captured and no photo: [`VcardError::NoValidParameters`]
/// - neither `N` nor `FN`: [`VcardError::MissingName`]
/// - both: `N` is dropped, `FN` stays
/// - only `N`: its value moves to `FN`
/// - only `FN`: unchanged
pub fn reconcile_names(
    extracted: ExtractedProperties,
    has_photo: bool,
) -> Result<BTreeMap<String, String>> {
    let ExtractedProperties {
        mut attributes,
        structured_name,
        formatted_name,
    } = extracted;

    if attributes.is_empty() && !has_photo {
        return Err(VcardError::NoValidParameters);
    }

    match (structured_name, formatted_name) {
        (false, false) => return Err(VcardError::MissingName),
        (true, true) => {
            attributes.remove(STRUCTURED_NAME);
        }
        (true, false) => {
            let name = attributes
                .remove(STRUCTURED_NAME)
                .ok_or(VcardError::MissingName)?;
            attributes.insert(CANONICAL_NAME.to_owned(), name);
        }
        (false, true) => {}
    }

    if !attributes.contains_key(CANONICAL_NAME) {
        return Err(VcardError::MissingName);
    }

    Ok(attributes)
}
