use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ObserverError, StatusEvent, StatusObserver};

/// One observer that failed while handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    pub observer: String,
    pub message: String,
    pub panicked: bool,
}

/// What happened during one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// Observers called, failed ones included.
    pub invoked: usize,
    pub failures: Vec<ObserverFailure>,
}

impl NotifyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-vehicle observer registry.
///
/// Observers are called in registration order. Each call is isolated: an
/// `Err` or a panic from one observer is recorded and logged, and delivery
/// continues with the next.
#[derive(Default)]
pub struct Notifier {
    observers: Mutex<Vec<Arc<dyn StatusObserver>>>,
}

impl Notifier {
    pub fn add_observer(&self, observer: Arc<dyn StatusObserver>) {
        self.lock().push(observer);
    }

    /// Remove the first registration of this exact observer instance.
    pub fn remove_observer<O: StatusObserver + ?Sized>(&self, observer: &Arc<O>) -> bool {
        let target = Arc::as_ptr(observer).cast::<()>();
        let mut observers = self.lock();
        match observers
            .iter()
            .position(|o| Arc::as_ptr(o).cast::<()>() == target)
        {
            Some(idx) => {
                observers.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn notify(&self, event: &StatusEvent) -> NotifyReport {
        // Snapshot so observers can add or remove observers while being called.
        let observers: Vec<Arc<dyn StatusObserver>> = self.lock().clone();
        let mut report = NotifyReport::default();

        for observer in observers {
            report.invoked += 1;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                observer.on_status_changed(event)
            }));
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(ObserverError { message })) => ObserverFailure {
                    observer: observer.name().to_string(),
                    message,
                    panicked: false,
                },
                Err(payload) => ObserverFailure {
                    observer: observer.name().to_string(),
                    message: panic_message(payload.as_ref()),
                    panicked: true,
                },
            };
            log::warn!(
                "observer {} failed on {} {} -> {}: {}",
                failure.observer,
                event.license_plate,
                event.previous,
                event.status,
                failure.message
            );
            report.failures.push(failure);
        }

        report
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn StatusObserver>>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "observer panicked".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{VehicleId, VehicleStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        name: &'static str,
        calls: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl StatusObserver for Counting {
        fn name(&self) -> &str {
            self.name
        }

        fn on_status_changed(&self, _event: &StatusEvent) -> Result<(), ObserverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ObserverError::new("rejected"))
            } else {
                Ok(())
            }
        }
    }

    struct Panicking;

    impl StatusObserver for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn on_status_changed(&self, _event: &StatusEvent) -> Result<(), ObserverError> {
            panic!("boom");
        }
    }

    fn event() -> StatusEvent {
        StatusEvent {
            vehicle_id: VehicleId::from_raw(7),
            license_plate: "EV-7".into(),
            previous: VehicleStatus::Available,
            status: VehicleStatus::InUse,
        }
    }

    #[test]
    fn failures_do_not_stop_fan_out() {
        let notifier = Notifier::default();
        let first = Counting::new("first", true);
        let last = Counting::new("last", false);
        notifier.add_observer(first.clone());
        notifier.add_observer(Arc::new(Panicking));
        notifier.add_observer(last.clone());

        let report = notifier.notify(&event());

        assert_eq!(report.invoked, 3);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].observer, "first");
        assert!(!report.failures[0].panicked);
        assert_eq!(report.failures[1].message, "boom");
        assert!(report.failures[1].panicked);
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(last.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn remove_by_identity() {
        let notifier = Notifier::default();
        let a = Counting::new("a", false);
        let b = Counting::new("a", false);
        notifier.add_observer(a.clone());
        notifier.add_observer(b.clone());

        assert!(notifier.remove_observer(&a));
        assert!(!notifier.remove_observer(&a));
        assert_eq!(notifier.len(), 1);

        notifier.notify(&event());
        assert_eq!(a.calls.load(Ordering::SeqCst), 0);
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_registry_reports_nothing() {
        let notifier = Notifier::default();
        assert!(notifier.is_empty());
        let report = notifier.notify(&event());
        assert_eq!(report, NotifyReport::default());
        assert!(report.is_clean());
    }
}
