//! Bulk export/import between pair arrays and parallel key/value arrays.
//!
//! Keyed maps built on top of [`Array`] snapshot their contents as two parallel
//! arrays (keys and values in corresponding order) and rebuild from them in one
//! linear pass. Every function here reserves its output once up front, so a
//! rebuild never pays per-insert growth.

use strata_common::{Error, Result};

use crate::Array;

/// Splits `(key, value)` pairs into parallel key and value arrays.
pub fn unzip_pairs<K, V>(mut pairs: Array<(K, V)>) -> Result<(Array<K>, Array<V>)> {
    let options = pairs.options().clone();
    let mut keys = Array::with_capacity_and_options(pairs.len(), options.clone())?;
    let mut values = Array::with_capacity_and_options(pairs.len(), options)?;
    for (key, value) in pairs.take() {
        keys.append(key)?;
        values.append(value)?;
    }
    Ok((keys, values))
}

/// Joins parallel key and value arrays into `(key, value)` pairs.
///
/// Fails with `InvalidArgument` when the lengths differ; neither input is consumed
/// in that case beyond being dropped.
pub fn zip_parallel<K, V>(keys: Array<K>, values: Array<V>) -> Result<Array<(K, V)>> {
    if keys.len() != values.len() {
        return Err(Error::invalid_arg(
            "values",
            format!(
                "key count {} does not match value count {}",
                keys.len(),
                values.len()
            ),
        ));
    }
    let mut pairs = Array::with_capacity_and_options(keys.len(), keys.options().clone())?;
    for pair in keys.into_iter().zip(values) {
        pairs.append(pair)?;
    }
    Ok(pairs)
}

/// Copies `(key, value)` pairs out as parallel key and value snapshots.
pub fn export_parallel<K, V>(pairs: &[(K, V)]) -> Result<(Array<K>, Array<V>)>
where
    K: Clone,
    V: Clone,
{
    let mut keys = Array::with_capacity(pairs.len())?;
    let mut values = Array::with_capacity(pairs.len())?;
    for (key, value) in pairs {
        keys.append(key.clone())?;
        values.append(value.clone())?;
    }
    Ok((keys, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unzip_then_zip() {
        let pairs: Array<(u32, String)> =
            Array::from(vec![(3, "c".to_string()), (1, "a".to_string())]);
        let (keys, values) = unzip_pairs(pairs).unwrap();
        assert_eq!(keys.as_slice(), &[3, 1]);
        assert_eq!(values.as_slice(), &["c", "a"]);

        let pairs = zip_parallel(keys, values).unwrap();
        assert_eq!(pairs.read_at(1).unwrap(), (1, "a".to_string()));
    }

    #[test]
    fn test_zip_length_mismatch() {
        let keys = Array::from(vec![1, 2, 3]);
        let values = Array::from(vec!["x"]);
        let err = zip_parallel(keys, values).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_export_leaves_source() {
        let pairs = Array::from(vec![(1u8, 10u16), (2, 20)]);
        let (keys, values) = export_parallel(pairs.as_slice()).unwrap();
        assert_eq!(keys.as_slice(), &[1, 2]);
        assert_eq!(values.as_slice(), &[10, 20]);
        assert_eq!(pairs.len(), 2);
    }
}
