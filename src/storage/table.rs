use crate::storage::entity::{Patch, Record, Validate};
use crate::storage::error::StoreError;
use std::collections::HashMap;
use tokio::sync::RwLock;

struct Rows<T> {
    // 按插入顺序保存；记录从不删除，所以下标稳定
    rows: Vec<T>,
    index: HashMap<String, usize>,
}

/// 单个实体类型的内存表：一把读写锁保护整张表，单条 insert / update 在锁内完成。
pub struct Table<T> {
    inner: RwLock<Rows<T>>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Table<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                rows: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        let guard = self.inner.read().await;
        guard.index.get(id).map(|&i| guard.rows[i].clone())
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.inner.read().await.index.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 插入前在写锁内执行 `check`，用于唯一键校验；失败时表保持不变。
    pub async fn insert_with<F>(&self, row: T, check: F) -> Result<T, StoreError>
    where
        T: Validate,
        F: FnOnce(&[T], &T) -> Result<(), StoreError>,
    {
        row.validate()?;
        let mut guard = self.inner.write().await;
        if guard.index.contains_key(row.id()) {
            return Err(StoreError::duplicate("id", row.id()));
        }
        check(&guard.rows, &row)?;
        let pos = guard.rows.len();
        guard.index.insert(row.id().to_string(), pos);
        guard.rows.push(row.clone());
        Ok(row)
    }

    pub async fn insert(&self, row: T) -> Result<T, StoreError>
    where
        T: Validate,
    {
        self.insert_with(row, |_, _| Ok(())).await
    }

    /// 合并补丁后整体校验，通过才写回。`Ok(None)` 表示 id 不存在。
    pub async fn update<P>(&self, id: &str, patch: P) -> Result<Option<T>, StoreError>
    where
        T: Validate,
        P: Patch<T>,
    {
        let mut guard = self.inner.write().await;
        let Some(&pos) = guard.index.get(id) else {
            return Ok(None);
        };
        let mut next = guard.rows[pos].clone();
        patch.apply_to(&mut next);
        next.validate()?;
        guard.rows[pos] = next.clone();
        Ok(Some(next))
    }

    pub async fn update_with<F>(&self, id: &str, apply: F) -> Result<Option<T>, StoreError>
    where
        T: Validate,
        F: FnOnce(&mut T),
    {
        let mut guard = self.inner.write().await;
        let Some(&pos) = guard.index.get(id) else {
            return Ok(None);
        };
        let mut next = guard.rows[pos].clone();
        apply(&mut next);
        next.validate()?;
        guard.rows[pos] = next.clone();
        Ok(Some(next))
    }

    pub async fn find<F>(&self, pred: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let guard = self.inner.read().await;
        guard.rows.iter().find(|r| pred(r)).cloned()
    }

    /// 按插入顺序返回满足条件的记录
    pub async fn filter<F>(&self, pred: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let guard = self.inner.read().await;
        guard.rows.iter().filter(|r| pred(r)).cloned().collect()
    }

    pub async fn all(&self) -> Vec<T> {
        self.inner.read().await.rows.clone()
    }

    pub async fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let guard = self.inner.read().await;
        guard.rows.iter().filter(|r| pred(r)).count()
    }
}
