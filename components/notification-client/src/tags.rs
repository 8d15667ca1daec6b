/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Tag set arithmetic used by the add/delete tag operations.

use crate::models::Tags;

/// Union of both tag sets. On a key collision the value from `to_add` wins.
pub fn add_tags(tags: &Tags, to_add: &Tags) -> Tags {
    let mut merged = tags.clone();
    merged.extend(to_add.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Removes every key whose value in `tags` is equal to the value under the
/// same key in `to_delete`.
///
/// Matching is on key *and* value: `{x: 1}` does not remove `x` from
/// `{x: 2}`. Callers that want to drop a key regardless of its value must
/// pass the current value.
pub fn delete_tags(tags: &Tags, to_delete: &Tags) -> Tags {
    tags.iter()
        .filter(|(key, value)| to_delete.get(*key) != Some(*value))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
