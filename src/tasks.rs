//! # 后台任务队列
//!
//! 编排器只负责投递任务，消费方（Web 服务器配置重建）不在本 crate 内

use async_trait::async_trait;
use chrono::Utc;
use entity::tasks;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::error::Result;
use crate::{linfo, logging::{LogComponent, LogStage}};

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// 重建 Web 服务器虚拟主机配置
    RebuildVhosts,
}

impl TaskKind {
    /// 持久化使用的任务类型编号
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::RebuildVhosts => 1,
        }
    }
}

/// 任务投递结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// 新建了任务
    Enqueued,
    /// 同类任务已在等待中
    AlreadyPending,
}

/// 任务队列
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// 投递一个任务
    async fn enqueue(&self, kind: TaskKind) -> Result<EnqueueOutcome>;
}

/// 基于 `tasks` 表的任务队列
#[derive(Debug, Clone)]
pub struct DbTaskQueue {
    db: DatabaseConnection,
}

impl DbTaskQueue {
    /// 创建任务队列
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// 统计某类待处理任务的数量
    pub async fn pending(&self, kind: TaskKind) -> Result<u64> {
        Ok(tasks::Entity::find()
            .filter(tasks::Column::TaskType.eq(kind.code()))
            .count(&self.db)
            .await?)
    }
}

#[async_trait]
impl TaskQueue for DbTaskQueue {
    async fn enqueue(&self, kind: TaskKind) -> Result<EnqueueOutcome> {
        if self.pending(kind).await? > 0 {
            linfo!(
                "system",
                LogStage::Reconcile,
                LogComponent::TaskQueue,
                "enqueue_skipped",
                "同类任务已在队列中，跳过投递",
                task_type = kind.code()
            );
            return Ok(EnqueueOutcome::AlreadyPending);
        }

        let task = tasks::ActiveModel {
            task_type: Set(kind.code()),
            data: Set(None),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        task.insert(&self.db).await?;

        linfo!(
            "system",
            LogStage::Reconcile,
            LogComponent::TaskQueue,
            "enqueued",
            "任务已投递",
            task_type = kind.code()
        );
        Ok(EnqueueOutcome::Enqueued)
    }
}
