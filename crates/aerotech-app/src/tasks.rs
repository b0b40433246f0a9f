// Technician task list: assigned work first, then sprint context.

use aerotech_core::models::sprint::RecentItem;
use aerotech_core::models::work_package::{WorkPackage, WorkPackageStatus};
use aerotech_core::protocol::{TaskItem, TaskSource};

/// Merge the technician's assigned packages with recent sprint items.
///
/// In-progress packages rank 1, other assigned packages 2, sprint items 3.
/// The sort is stable, so backend order is kept within a rank.
pub fn build_task_list(assigned: &[WorkPackage], recent: &[RecentItem]) -> Vec<TaskItem> {
    let mut tasks: Vec<TaskItem> = assigned
        .iter()
        .map(|wp| TaskItem {
            id: wp.key().to_string(),
            title: wp.display_title().to_string(),
            status: wp.status.clone(),
            source: TaskSource::WorkPackage,
            priority: if wp.status == WorkPackageStatus::InProgress { 1 } else { 2 },
        })
        .chain(recent.iter().map(|item| TaskItem {
            id: item.id.clone(),
            title: item.title.clone(),
            status: WorkPackageStatus::from(Some(item.status.clone())),
            source: TaskSource::Sprint,
            priority: 3,
        }))
        .collect();

    tasks.sort_by_key(|t| t.priority);
    tasks
}
