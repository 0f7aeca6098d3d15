#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::sync::{Arc, Mutex};

    use anyhow::{anyhow, Result};
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

    use crate::error::{Field, Rule, TodoError};
    use crate::model::todo::{CreateTodo, NewTodo, Priority, Todo, TodoId, TodoPatch};
    use crate::repository::{MemoryTodoStore, TodoStore};
    use crate::service::clock::{Clock, FixedClock};
    use crate::service::todo_service::TodoService;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    /// Advances one minute every time it is read.
    struct TickingClock {
        next: Cell<DateTime<Utc>>,
    }

    impl TickingClock {
        fn starting_at(time: DateTime<Utc>) -> Self {
            Self { next: Cell::new(time) }
        }
    }

    impl Clock for TickingClock {
        fn now(&self) -> DateTime<Utc> {
            let t = self.next.get();
            self.next.set(t + Duration::minutes(1));
            t
        }
    }

    fn service() -> TodoService<MemoryTodoStore, TickingClock> {
        TodoService::with_clock(MemoryTodoStore::new(), TickingClock::starting_at(now()))
    }

    fn ids(todos: &[Todo]) -> Vec<TodoId> {
        let mut ids: Vec<TodoId> = todos.iter().map(|t| t.id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_create_starts_incomplete_and_never_updated() {
        let svc = service();
        let todo = svc
            .create(CreateTodo::new("  Buy milk ", Priority::High).with_description("   "))
            .unwrap();

        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description, None);
        assert!(!todo.completed);
        assert!(todo.updated_at.is_none());
        assert_eq!(todo.created_at, now());
        assert_eq!(svc.get_by_id(todo.id).unwrap(), todo);
    }

    #[test]
    fn test_create_blank_title_is_invalid() {
        let svc = service();
        let err = svc.create(CreateTodo::new("", Priority::Low)).unwrap_err();
        let validation = err.validation().expect("expected InvalidInput");
        assert_eq!(validation.field, Field::Title);
        assert_eq!(validation.rule, Rule::Blank);
        assert!(svc.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_create_long_description_is_invalid() {
        let svc = service();
        let input = CreateTodo::new("Write report", Priority::Urgent).with_description("x".repeat(1001));
        let err = svc.create(input).unwrap_err();
        assert_eq!(err.validation().map(|v| v.field), Some(Field::Description));
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let svc = service();
        let patch = TodoPatch {
            title: Some("anything".to_string()),
            ..TodoPatch::default()
        };
        let err = svc.update(TodoId(999), patch).unwrap_err();
        assert!(matches!(err, TodoError::NotFound(TodoId(999))));
    }

    #[test]
    fn test_update_is_partial() {
        let svc = service();
        let due = now() + Duration::days(2);
        let created = svc
            .create(CreateTodo::new("Call doctor", Priority::Medium).with_due_date(due))
            .unwrap();

        let patch = TodoPatch {
            description: Some(Some("new text".to_string())),
            ..TodoPatch::default()
        };
        let updated = svc.update(created.id, patch).unwrap();

        assert_eq!(updated.description.as_deref(), Some("new text"));
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.priority, created.priority);
        assert_eq!(updated.due_date, created.due_date);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.completed, created.completed);
        assert!(updated.updated_at.unwrap() > created.created_at);
    }

    #[test]
    fn test_update_can_clear_optional_fields() {
        let svc = service();
        let created = svc
            .create(
                CreateTodo::new("Order gift", Priority::Low)
                    .with_description("birthday")
                    .with_due_date(now()),
            )
            .unwrap();

        let patch = TodoPatch {
            description: Some(None),
            due_date: Some(None),
            ..TodoPatch::default()
        };
        let updated = svc.update(created.id, patch).unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.due_date, None);
    }

    #[test]
    fn test_update_revalidates_touched_fields() {
        let svc = service();
        let created = svc.create(CreateTodo::new("Clean apartment", Priority::Medium)).unwrap();

        let patch = TodoPatch {
            title: Some("   ".to_string()),
            ..TodoPatch::default()
        };
        let err = svc.update(created.id, patch).unwrap_err();
        assert_eq!(err.validation().map(|v| v.field), Some(Field::Title));

        // nothing was written
        assert_eq!(svc.get_by_id(created.id).unwrap(), created);
    }

    #[test]
    fn test_empty_patch_still_stamps() {
        let svc = service();
        let created = svc.create(CreateTodo::new("Study", Priority::Low)).unwrap();
        let updated = svc.update(created.id, TodoPatch::default()).unwrap();
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_updated_at_never_before_created_at() {
        // Clock reads earlier than the stored created_at.
        let store = MemoryTodoStore::new();
        let id = store
            .insert(NewTodo {
                title: "From the future".to_string(),
                description: None,
                priority: Priority::Low,
                created_at: now() + Duration::hours(1),
                due_date: None,
            })
            .unwrap();
        let svc = TodoService::with_clock(&store, FixedClock::new(now()));

        let toggled = svc.toggle_completed(id, true).unwrap();
        assert_eq!(toggled.updated_at, Some(toggled.created_at));
    }

    #[test]
    fn test_delete() {
        let svc = service();
        let created = svc.create(CreateTodo::new("Temp", Priority::Low)).unwrap();

        svc.delete(created.id).unwrap();
        assert!(svc.get_by_id(created.id).unwrap_err().is_not_found());
        assert!(svc.delete(created.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_toggle_missing_id_is_not_found() {
        let svc = service();
        assert!(svc.toggle_completed(TodoId(7), true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_overdue_scenario() {
        let svc = service();
        let yesterday = now() - Duration::days(1);
        let milk = svc
            .create(CreateTodo::new("Buy milk", Priority::High).with_due_date(yesterday))
            .unwrap();

        assert_eq!(ids(&svc.list_overdue(now()).unwrap()), vec![milk.id]);

        let done = svc.toggle_completed(milk.id, true).unwrap();
        assert!(done.completed);
        assert!(done.updated_at.unwrap() >= done.created_at);

        assert!(svc.list_overdue(now()).unwrap().is_empty());
        assert_eq!(ids(&svc.list_completed().unwrap()), vec![milk.id]);

        let reopened = svc.mark_incomplete(milk.id).unwrap();
        assert!(!reopened.completed);
        assert_eq!(ids(&svc.list_overdue(now()).unwrap()), vec![milk.id]);
    }

    #[test]
    fn test_overdue_is_exact() {
        let svc = service();
        svc.create(CreateTodo::new("No deadline", Priority::Low)).unwrap();
        let past = svc
            .create(CreateTodo::new("Past", Priority::Low).with_due_date(now() - Duration::seconds(1)))
            .unwrap();
        svc.create(CreateTodo::new("Now", Priority::Low).with_due_date(now()))
            .unwrap();
        svc.create(CreateTodo::new("Future", Priority::Low).with_due_date(now() + Duration::hours(3)))
            .unwrap();
        let done_past = svc
            .create(CreateTodo::new("Done", Priority::Low).with_due_date(now() - Duration::days(3)))
            .unwrap();
        svc.mark_completed(done_past.id).unwrap();

        let overdue = svc.list_overdue(now()).unwrap();
        assert_eq!(ids(&overdue), vec![past.id]);
        for todo in svc.list_all().unwrap() {
            let expected = !todo.completed && todo.due_date.is_some_and(|d| d < now());
            assert_eq!(overdue.iter().any(|t| t.id == todo.id), expected, "{}", todo.title);
        }
    }

    #[test]
    fn test_list_active_orders_by_priority() {
        let svc = service();
        let low = svc.create(CreateTodo::new("low", Priority::Low)).unwrap();
        let urgent = svc.create(CreateTodo::new("urgent", Priority::Urgent)).unwrap();
        let medium = svc.create(CreateTodo::new("medium", Priority::Medium)).unwrap();
        let high = svc.create(CreateTodo::new("high", Priority::High)).unwrap();
        let done = svc.create(CreateTodo::new("done", Priority::Urgent)).unwrap();
        svc.mark_completed(done.id).unwrap();

        let active = svc.list_active().unwrap();
        let order: Vec<TodoId> = active.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![urgent.id, high.id, medium.id, low.id]);
        assert!(active.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_list_completed_most_recent_first() {
        let svc = service();
        let a = svc.create(CreateTodo::new("a", Priority::Low)).unwrap();
        let b = svc.create(CreateTodo::new("b", Priority::Low)).unwrap();
        let c = svc.create(CreateTodo::new("c", Priority::Low)).unwrap();
        svc.mark_completed(b.id).unwrap();
        svc.mark_completed(a.id).unwrap();

        let completed = svc.list_completed().unwrap();
        let order: Vec<TodoId> = completed.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![a.id, b.id]);
        assert!(completed.iter().all(|t| t.completed));
        assert!(!order.contains(&c.id));
    }

    #[test]
    fn test_search() {
        let svc = service();
        let groceries = svc
            .create(CreateTodo::new("Buy groceries", Priority::High).with_description("Milk, bread, eggs"))
            .unwrap();
        let milk = svc.create(CreateTodo::new("Return MILK bottles", Priority::Low)).unwrap();
        svc.create(CreateTodo::new("Write report", Priority::Urgent)).unwrap();

        let all = ids(&svc.list_all().unwrap());
        assert_eq!(ids(&svc.search(None).unwrap()), all);
        assert_eq!(ids(&svc.search(Some("")).unwrap()), all);
        assert_eq!(ids(&svc.search(Some("   ")).unwrap()), all);

        assert_eq!(ids(&svc.search(Some("  milk ")).unwrap()), vec![groceries.id, milk.id]);
        assert_eq!(ids(&svc.search(Some("BREAD")).unwrap()), vec![groceries.id]);
        assert!(svc.search(Some("holiday")).unwrap().is_empty());
    }

    #[test]
    fn test_due_today_uses_callers_calendar() {
        let svc = service();
        let morning = svc
            .create(
                CreateTodo::new("Morning", Priority::Low)
                    .with_due_date(Utc.with_ymd_and_hms(2025, 6, 15, 1, 0, 0).unwrap()),
            )
            .unwrap();
        let late = svc
            .create(
                CreateTodo::new("Late", Priority::Low)
                    .with_due_date(Utc.with_ymd_and_hms(2025, 6, 15, 22, 0, 0).unwrap()),
            )
            .unwrap();
        let done = svc
            .create(CreateTodo::new("Done", Priority::Low).with_due_date(now()))
            .unwrap();
        svc.mark_completed(done.id).unwrap();
        svc.create(CreateTodo::new("Undated", Priority::Low)).unwrap();

        assert_eq!(ids(&svc.list_due_today(&now()).unwrap()), vec![morning.id, late.id]);

        // At +05:00, 22:00 UTC on the 15th falls on the 16th.
        let plus_five = FixedOffset::east_opt(5 * 3600).unwrap();
        let local_now = now().with_timezone(&plus_five);
        assert_eq!(local_now.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(ids(&svc.list_due_today(&local_now).unwrap()), vec![morning.id]);
    }

    #[test]
    fn test_stats() {
        let svc = service();
        assert_eq!(svc.get_stats(now()).unwrap().total, 0);

        let overdue = svc
            .create(CreateTodo::new("Overdue", Priority::High).with_due_date(now() - Duration::days(1)))
            .unwrap();
        svc.create(CreateTodo::new("Later", Priority::Low).with_due_date(now() + Duration::days(1)))
            .unwrap();
        let done = svc.create(CreateTodo::new("Done", Priority::Low)).unwrap();
        svc.mark_completed(done.id).unwrap();

        let stats = svc.get_stats(now()).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.total, stats.completed + stats.active);

        svc.mark_completed(overdue.id).unwrap();
        let stats = svc.get_stats(now()).unwrap();
        assert_eq!(stats.overdue, 0);
        assert!(stats.overdue <= stats.active);
        assert_eq!(stats.total, stats.completed + stats.active);
    }

    struct BrokenStore;

    impl TodoStore for BrokenStore {
        fn insert(&self, _todo: NewTodo) -> Result<TodoId> { Err(anyhow!("store unavailable")) }
        fn find_by_id(&self, _id: TodoId) -> Result<Option<Todo>> { Err(anyhow!("store unavailable")) }
        fn find_all(&self) -> Result<Vec<Todo>> { Err(anyhow!("store unavailable")) }
        fn find_active_ordered_by_priority_desc(&self) -> Result<Vec<Todo>> { unimplemented!() }
        fn find_completed_ordered_by_updated_at_desc(&self) -> Result<Vec<Todo>> { unimplemented!() }
        fn find_by_text_contains(&self, _term: &str) -> Result<Vec<Todo>> { unimplemented!() }
        fn find_overdue(&self, _now: DateTime<Utc>) -> Result<Vec<Todo>> { unimplemented!() }
        fn find_due_on_date(&self, _date: NaiveDate, _offset: FixedOffset) -> Result<Vec<Todo>> { unimplemented!() }
        fn count(&self) -> Result<u64> { unimplemented!() }
        fn count_completed(&self) -> Result<u64> { Err(anyhow!("store unavailable")) }
        fn count_active(&self) -> Result<u64> { unimplemented!() }
        fn save(&self, _todo: &Todo) -> Result<bool> { unimplemented!() }
        fn delete_by_id(&self, _id: TodoId) -> Result<bool> { Err(anyhow!("store unavailable")) }
    }

    #[test]
    fn test_store_errors_pass_through() {
        let svc = TodoService::with_clock(BrokenStore, FixedClock::new(now()));

        for err in [
            svc.list_all().unwrap_err(),
            svc.get_by_id(TodoId(1)).unwrap_err(),
            svc.delete(TodoId(1)).unwrap_err(),
            svc.get_stats(now()).unwrap_err(),
            svc.create(CreateTodo::new("x", Priority::Low)).unwrap_err(),
        ] {
            assert!(matches!(err, TodoError::Store(_)));
            assert_eq!(err.to_string(), "store unavailable");
        }

        // validation runs before the store is touched
        let err = svc.create(CreateTodo::new(" ", Priority::Low)).unwrap_err();
        assert!(matches!(err, TodoError::InvalidInput(_)));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_reads_emit_debug_events() {
        let captured = CapturedLogs::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let svc = service();
        let todo = svc.create(CreateTodo::new("Logged", Priority::Low)).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            svc.list_all().unwrap();
            svc.list_active().unwrap();
            svc.list_completed().unwrap();
            svc.get_by_id(todo.id).unwrap();
            svc.list_overdue(now()).unwrap();
            svc.list_due_today(&now()).unwrap();
            svc.get_stats(now()).unwrap();
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        for message in [
            "listing all todos",
            "listing active todos",
            "listing completed todos",
            "fetching todo",
            "listing overdue todos",
            "listing todos due today",
            "computing todo stats",
        ] {
            assert!(logs.contains(message), "missing debug event: {}", message);
        }
        assert!(logs.contains("DEBUG"));
    }
}
