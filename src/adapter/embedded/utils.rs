//! 嵌入式文档库工具函数模块
//!
//! 包含BSON数据转换、ID字段映射（id <-> _id）等工具函数

use crate::error::{DocStoreError, DocStoreResult};
use crate::i18n::tf;
use crate::types::{DataValue, Document};
use chrono::{DateTime, Utc};
use polodb_core::bson::oid::ObjectId;
use polodb_core::bson::spec::BinarySubtype;
use polodb_core::bson::{self, Binary, Bson, Document as BsonDocument};
use rat_logger::warn;

/// 驱动使用的ID字段名
pub(crate) const DRIVER_ID_FIELD: &str = "_id";
/// 对外暴露的ID字段名
pub(crate) const ID_FIELD: &str = "id";

/// 将DataValue转换为BSON值
pub(crate) fn data_value_to_bson(value: &DataValue) -> Bson {
    match value {
        DataValue::Null => Bson::Null,
        DataValue::Bool(b) => Bson::Boolean(*b),
        DataValue::Int(i) => Bson::Int64(*i),
        DataValue::Float(f) => Bson::Double(*f),
        DataValue::String(s) => Bson::String(s.clone()),
        DataValue::Bytes(bytes) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.clone(),
        }),
        DataValue::DateTime(dt) => Bson::DateTime(bson::DateTime::from_millis(dt.timestamp_millis())),
        DataValue::Array(arr) => Bson::Array(arr.iter().map(data_value_to_bson).collect()),
        DataValue::Object(obj) => Bson::Document(document_to_bson(obj)),
    }
}

/// 将BSON值转换为DataValue
///
/// 超出 chrono 表示范围的日期时间返回错误，不做截断
pub(crate) fn bson_to_data_value(value: &Bson) -> DocStoreResult<DataValue> {
    let converted = match value {
        Bson::Null | Bson::Undefined => DataValue::Null,
        Bson::Boolean(b) => DataValue::Bool(*b),
        Bson::Int32(i) => DataValue::Int(*i as i64),
        Bson::Int64(i) => DataValue::Int(*i),
        Bson::Double(d) => DataValue::Float(*d),
        Bson::String(s) => DataValue::String(s.clone()),
        Bson::ObjectId(oid) => DataValue::String(oid.to_hex()),
        Bson::Binary(bin) => DataValue::Bytes(bin.bytes.clone()),
        Bson::DateTime(dt) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
            .map(DataValue::DateTime)
            .ok_or_else(|| {
                conversion_error(&format!("日期时间超出范围: {}ms", dt.timestamp_millis()))
            })?,
        Bson::Array(arr) => DataValue::Array(
            arr.iter()
                .map(bson_to_data_value)
                .collect::<DocStoreResult<Vec<_>>>()?,
        ),
        Bson::Document(doc) => DataValue::Object(bson_document_to_map(doc)?),
        Bson::Timestamp(ts) => DataValue::Object(
            [
                ("time".to_string(), DataValue::Int(ts.time as i64)),
                ("increment".to_string(), DataValue::Int(ts.increment as i64)),
            ]
            .into_iter()
            .collect(),
        ),
        Bson::Symbol(s) => DataValue::String(s.clone()),
        // 其余类型没有对应的DataValue，使用其文本表示
        other => DataValue::String(other.to_string()),
    };
    Ok(converted)
}

fn bson_document_to_map(doc: &BsonDocument) -> DocStoreResult<Document> {
    let mut map = Document::with_capacity(doc.len());
    for (key, value) in doc {
        map.insert(key.clone(), bson_to_data_value(value)?);
    }
    Ok(map)
}

/// BSON转换失败时的错误
pub(crate) fn conversion_error(message: &str) -> DocStoreError {
    crate::store_error!(
        serialization,
        tf("error.bson_convert", &[("message", message)])
    )
}

/// 将文档逐字段转换为BSON文档，不做任何字段映射
pub(crate) fn document_to_bson(doc: &Document) -> BsonDocument {
    let mut bson_doc = BsonDocument::new();
    for (key, value) in doc {
        bson_doc.insert(key.clone(), data_value_to_bson(value));
    }
    bson_doc
}

/// 转换ID值：24位十六进制字符串视为ObjectId
///
/// 运算符文档（如 `{"$in": [...]}`）中的操作数同样会被转换
pub(crate) fn id_value_to_bson(value: &DataValue) -> Bson {
    match value {
        DataValue::String(s) => match ObjectId::parse_str(s) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(s.clone()),
        },
        DataValue::Array(arr) => Bson::Array(arr.iter().map(id_value_to_bson).collect()),
        DataValue::Object(obj) if is_operator_document(obj) => {
            let mut operators = BsonDocument::new();
            for (op, operand) in obj {
                operators.insert(op.clone(), id_value_to_bson(operand));
            }
            Bson::Document(operators)
        }
        other => data_value_to_bson(other),
    }
}

/// 将实体转换为待插入的BSON文档（id -> _id）
///
/// 同时携带 `id` 与 `_id` 的实体无法确定标识，直接拒绝
pub(crate) fn entity_to_bson(entity: &Document) -> DocStoreResult<BsonDocument> {
    if entity.contains_key(ID_FIELD) && entity.contains_key(DRIVER_ID_FIELD) {
        return Err(conversion_error("文档不能同时包含 id 与 _id 字段"));
    }

    let mut doc = BsonDocument::new();
    for (key, value) in entity {
        if key == ID_FIELD || key == DRIVER_ID_FIELD {
            doc.insert(DRIVER_ID_FIELD, id_value_to_bson(value));
        } else {
            doc.insert(key.clone(), data_value_to_bson(value));
        }
    }
    Ok(doc)
}

/// 转换更新文档
///
/// 运算符文档（`$set`、`$unset` 等）内的 `id` 映射为 `_id`，
/// 由驱动拒绝对主键的修改；整体替换文档原样转换
pub(crate) fn translate_update(update: &Document) -> BsonDocument {
    let mut translated = BsonDocument::new();
    for (key, value) in update {
        match value {
            DataValue::Object(fields) if key.starts_with('$') => {
                let mut operand = BsonDocument::new();
                for (field, field_value) in fields {
                    if field == ID_FIELD || field == DRIVER_ID_FIELD {
                        operand.insert(DRIVER_ID_FIELD, id_value_to_bson(field_value));
                    } else {
                        operand.insert(field.clone(), data_value_to_bson(field_value));
                    }
                }
                translated.insert(key.clone(), operand);
            }
            other => {
                translated.insert(key.clone(), data_value_to_bson(other));
            }
        }
    }
    translated
}

/// 转换查询文档
///
/// 顶层的 `id` 映射为 `_id` 并转换ID值，`$and`/`$or`/`$nor` 中的子查询递归处理，
/// 其余内容原样交给驱动
pub(crate) fn translate_query(query: &Document) -> BsonDocument {
    let mut translated = BsonDocument::new();
    for (key, value) in query {
        match key.as_str() {
            ID_FIELD | DRIVER_ID_FIELD => {
                translated.insert(DRIVER_ID_FIELD, id_value_to_bson(value));
            }
            "$and" | "$or" | "$nor" => {
                let clauses = match value {
                    DataValue::Array(items) => Bson::Array(
                        items
                            .iter()
                            .map(|item| match item {
                                DataValue::Object(sub) => Bson::Document(translate_query(sub)),
                                other => data_value_to_bson(other),
                            })
                            .collect(),
                    ),
                    other => data_value_to_bson(other),
                };
                translated.insert(key.clone(), clauses);
            }
            _ => {
                translated.insert(key.clone(), data_value_to_bson(value));
            }
        }
    }
    translated
}

/// 转换驱动返回的文档：`_id` 重命名为 `id`，其余字段原样保留
///
/// ObjectId 转为十六进制字符串，其他类型的ID保持原类型，保证可以按返回的 `id` 再次查询。
/// 文档中存储的 `id` 字段不会覆盖真实ID
pub(crate) fn translate_result_item(doc: BsonDocument) -> DocStoreResult<Document> {
    let has_driver_id = doc.contains_key(DRIVER_ID_FIELD);
    let mut result = Document::with_capacity(doc.len());
    for (key, value) in doc {
        if key == DRIVER_ID_FIELD {
            result.insert(ID_FIELD.to_string(), id_to_data_value(&value)?);
        } else if key == ID_FIELD && has_driver_id {
            warn!("忽略文档中存储的id字段: {}", value);
        } else {
            result.insert(key, bson_to_data_value(&value)?);
        }
    }
    Ok(result)
}

/// 将驱动ID转换为对外的ID值
pub(crate) fn id_to_data_value(id: &Bson) -> DocStoreResult<DataValue> {
    match id {
        Bson::ObjectId(oid) => Ok(DataValue::String(oid.to_hex())),
        other => bson_to_data_value(other),
    }
}

/// 将ID转换为文本（用于日志和错误信息）
pub(crate) fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 判断更新文档是否使用更新运算符（`$set`、`$inc` 等）
///
/// 不含运算符的更新文档按整体替换处理
pub(crate) fn is_operator_update(update: &BsonDocument) -> bool {
    update.keys().any(|k| k.starts_with('$'))
}

/// 由查询中的等值条件构建upsert时的初始文档
///
/// 只保留顶层、非运算符的字段；`{"field": {"$eq": v}}` 视为等值条件
pub(crate) fn seed_from_query(query: &BsonDocument) -> BsonDocument {
    let mut seed = BsonDocument::new();
    for (key, value) in query {
        if key.starts_with('$') {
            continue;
        }
        match value {
            Bson::Document(inner) if inner.keys().any(|k| k.starts_with('$')) => {
                if let Some(eq) = inner.get("$eq") {
                    seed.insert(key.clone(), eq.clone());
                }
            }
            other => {
                seed.insert(key.clone(), other.clone());
            }
        }
    }
    seed
}

fn is_operator_document(obj: &Document) -> bool {
    !obj.is_empty() && obj.keys().all(|k| k.starts_with('$'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document;
    use polodb_core::bson::doc;

    const HEX_ID: &str = "65f0a1b2c3d4e5f601234567";

    #[test]
    fn test_translate_result_item_renames_id() {
        let oid = ObjectId::parse_str(HEX_ID).unwrap();
        let item = translate_result_item(doc! {
            "_id": oid,
            "name": "sensor",
            "nested": { "_id": 7 },
        })
        .unwrap();

        assert_eq!(item.get("id"), Some(&DataValue::String(HEX_ID.to_string())));
        assert!(!item.contains_key("_id"));
        assert_eq!(item.get("name"), Some(&DataValue::String("sensor".into())));

        // 只有顶层ID会被映射
        let nested = item.get("nested").and_then(DataValue::as_object).unwrap();
        assert_eq!(nested.get("_id"), Some(&DataValue::Int(7)));
    }

    #[test]
    fn test_translate_query_maps_id_field() {
        let query = document([
            ("id", DataValue::from(HEX_ID)),
            ("owner", DataValue::from("alice")),
        ]);
        let translated = translate_query(&query);

        assert_eq!(
            translated.get("_id"),
            Some(&Bson::ObjectId(ObjectId::parse_str(HEX_ID).unwrap()))
        );
        assert_eq!(translated.get_str("owner").unwrap(), "alice");
        assert!(!translated.contains_key("id"));
    }

    #[test]
    fn test_translate_query_non_hex_id_stays_string() {
        let query = document([("id", "5e1d7c3f-not-an-oid")]);
        let translated = translate_query(&query);
        assert_eq!(translated.get_str("_id").unwrap(), "5e1d7c3f-not-an-oid");
    }

    #[test]
    fn test_translate_query_operator_and_logical() {
        let query = document([(
            "$or",
            DataValue::Array(vec![
                DataValue::Object(document([(
                    "id",
                    DataValue::Object(document([(
                        "$in",
                        DataValue::Array(vec![HEX_ID.into(), "plain".into()]),
                    )])),
                )])),
                DataValue::Object(document([("online", true)])),
            ]),
        )]);

        let translated = translate_query(&query);
        let clauses = translated.get_array("$or").unwrap();
        let first = clauses[0].as_document().unwrap();
        let ids = first.get_document("_id").unwrap().get_array("$in").unwrap();
        assert!(matches!(ids[0], Bson::ObjectId(_)));
        assert_eq!(ids[1], Bson::String("plain".into()));
    }

    #[test]
    fn test_seed_from_query() {
        let query = doc! {
            "deviceID": "abc",
            "count": { "$gt": 3 },
            "kind": { "$eq": "core" },
            "$or": [ { "a": 1 } ],
        };
        let seed = seed_from_query(&query);
        assert_eq!(seed, doc! { "deviceID": "abc", "kind": "core" });
    }

    #[test]
    fn test_is_operator_update() {
        assert!(is_operator_update(&doc! { "$set": { "a": 1 } }));
        assert!(!is_operator_update(&doc! { "a": 1 }));
    }

    #[test]
    fn test_datetime_round_trip_millis() {
        let now = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
        let bson = data_value_to_bson(&DataValue::DateTime(now));
        assert_eq!(bson_to_data_value(&bson).unwrap(), DataValue::DateTime(now));
    }

    #[test]
    fn test_non_object_id_keeps_type() {
        let item = translate_result_item(doc! { "_id": 5_i64, "name": "counter" }).unwrap();
        assert_eq!(item.get("id"), Some(&DataValue::Int(5)));

        // 返回的ID可以直接用于查询
        let query = document([("id", item.get("id").cloned().unwrap())]);
        assert_eq!(translate_query(&query), doc! { "_id": 5_i64 });
    }

    #[test]
    fn test_stored_id_field_does_not_override() {
        let item = translate_result_item(doc! {
            "_id": "device-001",
            "id": "bogus",
        })
        .unwrap();
        assert_eq!(item.get("id"), Some(&DataValue::from("device-001")));
        assert_eq!(item.len(), 1);
    }

    #[test]
    fn test_translate_update_maps_id_in_operators() {
        let update = document([
            ("$set", DataValue::Object(document([("id", "bogus"), ("name", "x")]))),
            ("$inc", DataValue::Object(document([("count", 1)]))),
        ]);
        let translated = translate_update(&update);
        let set = translated.get_document("$set").unwrap();
        assert_eq!(set.get_str("_id").unwrap(), "bogus");
        assert!(!set.contains_key("id"));
        assert_eq!(set.get_str("name").unwrap(), "x");
        assert_eq!(translated.get_document("$inc").unwrap().get_i64("count").unwrap(), 1);
    }

    #[test]
    fn test_entity_with_both_id_fields_rejected() {
        let entity = document([("id", "a"), ("_id", "b")]);
        let err = entity_to_bson(&entity).unwrap_err();
        assert!(matches!(err, DocStoreError::SerializationError { .. }));

        let doc = entity_to_bson(&document([("_id", "b")])).unwrap();
        assert_eq!(doc, doc! { "_id": "b" });
    }

    #[test]
    fn test_datetime_out_of_range_is_error() {
        let bson = Bson::DateTime(bson::DateTime::from_millis(i64::MAX));
        let err = bson_to_data_value(&bson).unwrap_err();
        assert!(matches!(err, DocStoreError::SerializationError { .. }));

        // 嵌套在文档中同样报错
        assert!(translate_result_item(doc! { "_id": 1, "at": bson }).is_err());
    }

    #[test]
    fn test_timestamp_keeps_increment() {
        let bson = Bson::Timestamp(bson::Timestamp {
            time: 1_700_000_000,
            increment: 3,
        });
        let value = bson_to_data_value(&bson).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("time"), Some(&DataValue::Int(1_700_000_000)));
        assert_eq!(obj.get("increment"), Some(&DataValue::Int(3)));
    }
}
