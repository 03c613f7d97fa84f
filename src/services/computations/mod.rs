pub mod compute;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::models::computations::requests::{ComputationListQuery, ComputeGradesRequest};
use crate::storage::Storage;

/// 进程内的每教学班计算互斥表
///
/// 数据库里的 running 批次只能挡住跨进程的并发；同进程内
/// 两个请求可能都看到"无 running 批次"，先占住这张表再落库。
static COMPUTATION_GUARDS: Lazy<DashMap<i64, ()>> = Lazy::new(DashMap::new);

/// 教学班计算锁，Drop 时释放
///
/// 计算路径上的任何提前返回（包括请求被取消）都经由 Drop 释放，
/// 不存在泄漏占位的路径。
pub(crate) struct OfferingGuard {
    class_offering_id: i64,
}

impl OfferingGuard {
    /// 尝试占住教学班，已被占用时返回 None
    pub(crate) fn try_acquire(class_offering_id: i64) -> Option<Self> {
        use dashmap::mapref::entry::Entry;

        match COMPUTATION_GUARDS.entry(class_offering_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                entry.insert(());
                Some(Self { class_offering_id })
            }
        }
    }
}

impl Drop for OfferingGuard {
    fn drop(&mut self) {
        COMPUTATION_GUARDS.remove(&self.class_offering_id);
    }
}

pub struct ComputationService {
    storage: Option<Arc<dyn Storage>>,
}

impl ComputationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn compute_grades(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        user_id: i64,
        req: ComputeGradesRequest,
    ) -> ActixResult<HttpResponse> {
        compute::compute_grades(self, request, class_offering_id, user_id, req).await
    }

    pub async fn get_computation(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        computation_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_computation(self, request, class_offering_id, computation_id).await
    }

    pub async fn list_computations(
        &self,
        request: &HttpRequest,
        class_offering_id: i64,
        query: ComputationListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_computations(self, request, class_offering_id, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_excludes_same_offering() {
        let first = OfferingGuard::try_acquire(9001);
        assert!(first.is_some());
        assert!(OfferingGuard::try_acquire(9001).is_none());
        drop(first);
        assert!(OfferingGuard::try_acquire(9001).is_some());
    }

    #[test]
    fn test_guard_independent_offerings() {
        let a = OfferingGuard::try_acquire(9002);
        let b = OfferingGuard::try_acquire(9003);
        assert!(a.is_some());
        assert!(b.is_some());
    }
}
