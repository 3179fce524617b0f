//! 嵌入式文档库驱动调用模块
//!
//! 这里的函数都是同步的，只在工作线程中调用

use crate::adapter::embedded::utils;
use crate::error::DocStoreResult;
use crate::types::{Document, FindOptions, IdStrategy, RemoveResult, SortDirection};
use polodb_core::bson::{Bson, Document as BsonDocument, doc};
use polodb_core::{CollectionT, Database};
use rat_logger::debug;

pub(crate) fn insert_one(
    db: &Database,
    collection: &str,
    entity: &Document,
    id_strategy: IdStrategy,
) -> DocStoreResult<Document> {
    let mut doc = utils::entity_to_bson(entity)?;
    if !doc.contains_key(utils::DRIVER_ID_FIELD) {
        if let Some(id) = id_strategy.generate() {
            doc.insert(utils::DRIVER_ID_FIELD, id);
        }
    }

    debug!("执行插入到集合 {}: {:?}", collection, doc);

    let result = db.collection::<BsonDocument>(collection).insert_one(&doc)?;
    doc.insert(utils::DRIVER_ID_FIELD, result.inserted_id);

    utils::translate_result_item(doc)
}

pub(crate) fn find(
    db: &Database,
    collection: &str,
    query: &Document,
    options: &FindOptions,
) -> DocStoreResult<Vec<Document>> {
    let filter = utils::translate_query(query);
    debug!("执行查询: 集合={}, 条件={:?}, 选项={:?}", collection, filter, options);

    let coll = db.collection::<BsonDocument>(collection);
    let mut builder = coll.find(filter);
    if !options.sort.is_empty() {
        builder = builder.sort(build_sort_document(options));
    }
    if let Some(skip) = options.skip {
        builder = builder.skip(skip);
    }
    if let Some(limit) = options.limit {
        builder = builder.limit(limit);
    }

    let cursor = builder.run()?;
    let mut items = Vec::new();
    for item in cursor {
        items.push(utils::translate_result_item(item?)?);
    }

    debug!("查询返回 {} 条记录", items.len());
    Ok(items)
}

pub(crate) fn find_one(
    db: &Database,
    collection: &str,
    query: &Document,
) -> DocStoreResult<Option<Document>> {
    let filter = utils::translate_query(query);
    debug!("执行单条查询: 集合={}, 条件={:?}", collection, filter);

    let found = db.collection::<BsonDocument>(collection).find_one(filter)?;
    found.map(utils::translate_result_item).transpose()
}

/// 查找并修改（不存在时创建），返回修改后的文档
///
/// 整个过程在一个驱动事务中完成
pub(crate) fn find_and_modify(
    db: &Database,
    collection: &str,
    query: &Document,
    update: &Document,
    id_strategy: IdStrategy,
) -> DocStoreResult<Document> {
    let filter = utils::translate_query(query);
    let update = utils::translate_update(update);
    debug!(
        "执行查找并修改: 集合={}, 条件={:?}, 更新={:?}",
        collection, filter, update
    );

    let txn = db.start_transaction()?;
    let outcome = {
        let coll = txn.collection::<BsonDocument>(collection);
        modify_or_insert(&coll, filter, update, id_strategy)
    };

    match outcome {
        Ok(doc) => {
            txn.commit()?;
            utils::translate_result_item(doc)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback() {
                debug!("事务回滚失败: {}", rollback_err);
            }
            Err(e)
        }
    }
}

pub(crate) fn remove(
    db: &Database,
    collection: &str,
    query: &Document,
) -> DocStoreResult<RemoveResult> {
    let filter = utils::translate_query(query);
    debug!("执行删除: 集合={}, 条件={:?}", collection, filter);

    let result = db.collection::<BsonDocument>(collection).delete_many(filter)?;
    Ok(RemoveResult {
        deleted_count: result.deleted_count,
    })
}

fn modify_or_insert<C>(
    coll: &C,
    filter: BsonDocument,
    update: BsonDocument,
    id_strategy: IdStrategy,
) -> DocStoreResult<BsonDocument>
where
    C: CollectionT<BsonDocument>,
{
    let id = match coll.find_one(filter.clone())? {
        Some(existing) => {
            let id = existing
                .get(utils::DRIVER_ID_FIELD)
                .cloned()
                .ok_or_else(|| utils::conversion_error("驱动返回的文档缺少_id字段"))?;
            apply_update(coll, &id, update)?;
            id
        }
        None => {
            debug!("未找到匹配文档，执行upsert");
            upsert(coll, &filter, update, id_strategy)?
        }
    };

    coll.find_one(doc! { "_id": id.clone() })?
        .ok_or_else(|| {
            utils::conversion_error(&format!("修改后的文档不存在: {}", utils::id_to_string(&id)))
        })
}

fn apply_update<C>(coll: &C, id: &Bson, update: BsonDocument) -> DocStoreResult<()>
where
    C: CollectionT<BsonDocument>,
{
    let by_id = doc! { "_id": id.clone() };

    if utils::is_operator_update(&update) {
        coll.update_one(by_id, update)?;
        return Ok(());
    }

    // 整体替换：保留原ID，丢弃替换文档中的ID字段
    let mut replacement = strip_id_fields(update);
    replacement.insert(utils::DRIVER_ID_FIELD, id.clone());
    coll.delete_one(by_id)?;
    coll.insert_one(&replacement)?;
    Ok(())
}

fn upsert<C>(
    coll: &C,
    filter: &BsonDocument,
    update: BsonDocument,
    id_strategy: IdStrategy,
) -> DocStoreResult<Bson>
where
    C: CollectionT<BsonDocument>,
{
    let mut seed = utils::seed_from_query(filter);
    let operator_update = utils::is_operator_update(&update);

    if !operator_update {
        let seed_id = seed.remove(utils::DRIVER_ID_FIELD);
        seed = strip_id_fields(update.clone());
        if let Some(id) = seed_id {
            seed.insert(utils::DRIVER_ID_FIELD, id);
        }
    }

    if !seed.contains_key(utils::DRIVER_ID_FIELD) {
        if let Some(id) = id_strategy.generate() {
            seed.insert(utils::DRIVER_ID_FIELD, id);
        }
    }

    let id = coll.insert_one(&seed)?.inserted_id;
    if operator_update {
        apply_update(coll, &id, update)?;
    }
    Ok(id)
}

fn strip_id_fields(mut doc: BsonDocument) -> BsonDocument {
    doc.remove(utils::DRIVER_ID_FIELD);
    doc.remove(utils::ID_FIELD);
    doc
}

fn build_sort_document(options: &FindOptions) -> BsonDocument {
    let mut sort = BsonDocument::new();
    for item in &options.sort {
        let direction = match item.direction {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        };
        sort.insert(item.field.clone(), direction);
    }
    sort
}
