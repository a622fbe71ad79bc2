use fieldguard_core::{MapKey, Value, ValueMap};
use url::form_urlencoded;

/// Decode `application/x-www-form-urlencoded` pairs. A key seen once maps to
/// a string; a repeated key collects every value, in order, into a sequence.
pub(crate) fn decode(body: &[u8]) -> Value {
    let mut fields = ValueMap::new();
    for (key, value) in form_urlencoded::parse(body) {
        let key = MapKey::from(key.into_owned());
        let value = Value::string(value.into_owned());
        match fields.get_mut(&key) {
            None => {
                fields.insert(key, value);
            }
            Some(Value::Sequence(values)) => values.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::sequence([first, value]);
            }
        }
    }
    Value::Map(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
        match value {
            Value::Map(m) => &m[&MapKey::from(key)],
            other => panic!("expected map, got {}", other.type_name()),
        }
    }

    #[test]
    fn single_keys_are_strings() {
        let v = decode(b"name=Ada+Lovelace&email=ada%40example.com");
        assert_eq!(field(&v, "name"), &Value::string("Ada Lovelace"));
        assert_eq!(field(&v, "email"), &Value::string("ada@example.com"));
    }

    #[test]
    fn repeated_keys_become_sequences() {
        let v = decode(b"tag=a&name=x&tag=b&tag=c");
        assert_eq!(
            field(&v, "tag"),
            &Value::sequence([Value::string("a"), Value::string("b"), Value::string("c")])
        );
        assert_eq!(field(&v, "name"), &Value::string("x"));
    }

    #[test]
    fn empty_values_are_kept() {
        let v = decode(b"name=&flag");
        assert_eq!(field(&v, "name"), &Value::string(""));
        assert_eq!(field(&v, "flag"), &Value::string(""));
    }
}
