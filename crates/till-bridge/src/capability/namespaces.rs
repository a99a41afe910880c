//! Typed capability namespaces
//!
//! New call sites use these instead of channel strings:
//!
//! ```rust,ignore
//! bridge.orders().approve("o-42", Some(15)).await?;
//! bridge.settings().get("receipt.footer", None).await?;
//! ```
//!
//! Each method hands positional values to its [`OperationSpec`]; absent
//! optionals are passed as null and dropped by the normalizer.

use super::operations::{auth, customers, menu, orders, payments, printers, reports, settings, shifts, sync, system};
use super::OperationSpec;
use crate::error::TransportError;
use crate::router::PlatformBridge;
use serde_json::Value;

type CallResult = Result<Value, TransportError>;

macro_rules! namespace_view {
    ($(#[$meta:meta])* $name:ident, $accessor:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            bridge: &'a PlatformBridge,
        }

        impl<'a> $name<'a> {
            async fn run(&self, spec: OperationSpec, args: &[Value]) -> CallResult {
                self.bridge.dispatch(&spec, args).await
            }
        }

        impl PlatformBridge {
            $(#[$meta])*
            pub fn $accessor(&self) -> $name<'_> {
                $name { bridge: self }
            }
        }
    };
}

namespace_view!(
    /// Order lifecycle operations
    Orders, orders
);
namespace_view!(
    /// Shift accounting operations
    Shifts, shifts
);
namespace_view!(
    /// Payment operations
    Payments, payments
);
namespace_view!(
    /// Printer operations
    Printers, printers
);
namespace_view!(
    /// Menu operations
    Menu, menu
);
namespace_view!(
    /// Settings operations
    Settings, settings
);
namespace_view!(
    /// Staff authentication operations
    Auth, auth
);
namespace_view!(
    /// Cloud sync operations
    CloudSync, sync
);
namespace_view!(
    /// Application lifecycle operations
    System, system
);
namespace_view!(
    /// Customer directory operations
    Customers, customers
);
namespace_view!(
    /// Reporting operations
    Reports, reports
);

fn opt<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or(Value::Null, Into::into)
}

impl Orders<'_> {
    /// Create an order from an opaque order document
    pub async fn create(&self, order: Value) -> CallResult {
        self.run(orders::CREATE, &[order]).await
    }

    /// List orders, optionally filtered by status
    pub async fn get_all(&self, status: Option<&str>) -> CallResult {
        self.run(orders::GET_ALL, &[opt(status)]).await
    }

    /// Fetch one order
    pub async fn get_by_id(&self, order_id: &str) -> CallResult {
        self.run(orders::GET_BY_ID, &[order_id.into()]).await
    }

    /// Move an order to a new status
    pub async fn update_status(&self, order_id: &str, status: &str) -> CallResult {
        self.run(orders::UPDATE_STATUS, &[order_id.into(), status.into()]).await
    }

    /// Replace an order's line items
    pub async fn update_items(&self, order_id: &str, items: Value) -> CallResult {
        self.run(orders::UPDATE_ITEMS, &[order_id.into(), items]).await
    }

    /// Accept an incoming order with an optional preparation estimate in minutes
    pub async fn approve(&self, order_id: &str, estimated_minutes: Option<u32>) -> CallResult {
        self.run(orders::APPROVE, &[order_id.into(), opt(estimated_minutes)]).await
    }

    /// Reject an incoming order
    pub async fn decline(&self, order_id: &str, reason: Option<&str>) -> CallResult {
        self.run(orders::DECLINE, &[order_id.into(), opt(reason)]).await
    }

    /// Hand a delivery order to a driver
    pub async fn assign_driver(&self, order_id: &str, driver_id: &str, notes: Option<&str>) -> CallResult {
        self.run(orders::ASSIGN_DRIVER, &[order_id.into(), driver_id.into(), opt(notes)])
            .await
    }

    /// Delete an order
    pub async fn delete(&self, order_id: &str) -> CallResult {
        self.run(orders::DELETE, &[order_id.into()]).await
    }

    /// Orders awaiting approval
    pub async fn get_pending(&self) -> CallResult {
        self.run(orders::GET_PENDING, &[]).await
    }
}

impl Shifts<'_> {
    /// Open a cashier shift
    pub async fn open(&self, staff_id: &str, opening_cash: f64, branch_id: Option<&str>) -> CallResult {
        self.run(shifts::OPEN, &[staff_id.into(), opening_cash.into(), opt(branch_id)])
            .await
    }

    /// Close a shift with the counted drawer total
    pub async fn close(&self, shift_id: &str, closing_cash: f64, closed_by: Option<&str>) -> CallResult {
        self.run(shifts::CLOSE, &[shift_id.into(), closing_cash.into(), opt(closed_by)])
            .await
    }

    /// Active shift, for one staff member or the terminal
    pub async fn get_active(&self, staff_id: Option<&str>) -> CallResult {
        self.run(shifts::GET_ACTIVE, &[opt(staff_id)]).await
    }

    /// Totals of one shift
    pub async fn get_summary(&self, shift_id: &str) -> CallResult {
        self.run(shifts::GET_SUMMARY, &[shift_id.into()]).await
    }

    /// Record a cash-out expense against a shift
    pub async fn record_expense(&self, shift_id: &str, amount: f64, description: &str) -> CallResult {
        self.run(shifts::RECORD_EXPENSE, &[shift_id.into(), amount.into(), description.into()])
            .await
    }

    /// Expenses recorded against a shift
    pub async fn get_expenses(&self, shift_id: &str) -> CallResult {
        self.run(shifts::GET_EXPENSES, &[shift_id.into()]).await
    }
}

impl Payments<'_> {
    /// Capture a payment from an opaque payment document
    pub async fn process(&self, payment: Value) -> CallResult {
        self.run(payments::PROCESS, &[payment]).await
    }

    /// Refund all (`None`) or part of a payment
    pub async fn refund(&self, payment_id: &str, amount: Option<f64>, reason: Option<&str>) -> CallResult {
        self.run(payments::REFUND, &[payment_id.into(), opt(amount), opt(reason)])
            .await
    }

    /// Void a payment
    pub async fn void(&self, payment_id: &str, reason: Option<&str>) -> CallResult {
        self.run(payments::VOID, &[payment_id.into(), opt(reason)]).await
    }

    /// Payments recorded for an order
    pub async fn get_by_order(&self, order_id: &str) -> CallResult {
        self.run(payments::GET_BY_ORDER, &[order_id.into()]).await
    }

    /// Rendered receipt for an order
    pub async fn receipt_preview(&self, order_id: &str) -> CallResult {
        self.run(payments::RECEIPT_PREVIEW, &[order_id.into()]).await
    }
}

impl Printers<'_> {
    /// Configured printers
    pub async fn list(&self) -> CallResult {
        self.run(printers::LIST, &[]).await
    }

    /// Scan for printers on the network
    pub async fn discover(&self, timeout_ms: Option<u64>) -> CallResult {
        self.run(printers::DISCOVER, &[opt(timeout_ms)]).await
    }

    /// Register a printer from an opaque configuration document
    pub async fn add(&self, config: Value) -> CallResult {
        self.run(printers::ADD, &[config]).await
    }

    /// Remove a printer
    pub async fn remove(&self, printer_id: &str) -> CallResult {
        self.run(printers::REMOVE, &[printer_id.into()]).await
    }

    /// Print a test page
    pub async fn test(&self, printer_id: &str) -> CallResult {
        self.run(printers::TEST, &[printer_id.into()]).await
    }

    /// Make a printer the default for a role (receipt, kitchen, ...)
    pub async fn set_default(&self, printer_id: &str, role: Option<&str>) -> CallResult {
        self.run(printers::SET_DEFAULT, &[printer_id.into(), opt(role)]).await
    }

    /// Connection and paper status
    pub async fn get_status(&self, printer_id: &str) -> CallResult {
        self.run(printers::GET_STATUS, &[printer_id.into()]).await
    }

    /// Print a customer receipt
    pub async fn print_receipt(&self, order_id: &str, printer_id: Option<&str>) -> CallResult {
        self.run(printers::PRINT_RECEIPT, &[order_id.into(), opt(printer_id)]).await
    }

    /// Print a kitchen ticket
    pub async fn print_kitchen_ticket(&self, order_id: &str, printer_id: Option<&str>) -> CallResult {
        self.run(printers::PRINT_KITCHEN_TICKET, &[order_id.into(), opt(printer_id)])
            .await
    }

    /// Kick the cash drawer attached to a printer
    pub async fn open_cash_drawer(&self, printer_id: Option<&str>) -> CallResult {
        self.run(printers::OPEN_CASH_DRAWER, &[opt(printer_id)]).await
    }
}

impl Menu<'_> {
    /// Menu categories
    pub async fn get_categories(&self) -> CallResult {
        self.run(menu::GET_CATEGORIES, &[]).await
    }

    /// Items, optionally limited to one category
    pub async fn get_items(&self, category_id: Option<&str>) -> CallResult {
        self.run(menu::GET_ITEMS, &[opt(category_id)]).await
    }

    /// One menu item
    pub async fn get_item(&self, item_id: &str) -> CallResult {
        self.run(menu::GET_ITEM, &[item_id.into()]).await
    }

    /// Mark an item (un)available
    pub async fn update_availability(&self, item_id: &str, available: bool) -> CallResult {
        self.run(menu::UPDATE_AVAILABILITY, &[item_id.into(), available.into()])
            .await
    }

    /// Pull the menu from the cloud
    pub async fn sync(&self) -> CallResult {
        self.run(menu::SYNC, &[]).await
    }
}

impl Settings<'_> {
    /// One setting, optionally scoped to a category
    pub async fn get(&self, key: &str, category: Option<&str>) -> CallResult {
        self.run(settings::GET, &[key.into(), opt(category)]).await
    }

    /// Every setting, or every setting in one category
    pub async fn get_all(&self, category: Option<&str>) -> CallResult {
        self.run(settings::GET_ALL, &[opt(category)]).await
    }

    /// Write one setting
    pub async fn update(&self, key: &str, value: Value, category: Option<&str>) -> CallResult {
        self.run(settings::UPDATE, &[key.into(), value, opt(category)]).await
    }

    /// Restore factory settings
    pub async fn reset(&self) -> CallResult {
        self.run(settings::RESET, &[]).await
    }

    /// Terminal identity and branch binding
    pub async fn get_terminal_config(&self) -> CallResult {
        self.run(settings::GET_TERMINAL_CONFIG, &[]).await
    }
}

impl Auth<'_> {
    /// PIN login, optionally for a specific staff member
    pub async fn login(&self, pin: &str, staff_id: Option<&str>) -> CallResult {
        self.run(auth::LOGIN, &[pin.into(), opt(staff_id)]).await
    }

    /// End the current session
    pub async fn logout(&self) -> CallResult {
        self.run(auth::LOGOUT, &[]).await
    }

    /// Current session
    pub async fn get_session(&self) -> CallResult {
        self.run(auth::GET_SESSION, &[]).await
    }

    /// Check a PIN without opening a session
    pub async fn validate_pin(&self, pin: &str, staff_id: Option<&str>) -> CallResult {
        self.run(auth::VALIDATE_PIN, &[pin.into(), opt(staff_id)]).await
    }

    /// Whether a staff member holds a permission
    pub async fn check_permission(&self, permission: &str, staff_id: Option<&str>) -> CallResult {
        self.run(auth::CHECK_PERMISSION, &[permission.into(), opt(staff_id)])
            .await
    }
}

impl CloudSync<'_> {
    /// Start a sync cycle now
    pub async fn force(&self) -> CallResult {
        self.run(sync::FORCE, &[]).await
    }

    /// Queue depth and last sync time
    pub async fn get_status(&self) -> CallResult {
        self.run(sync::GET_STATUS, &[]).await
    }

    /// Requeue failed sync items
    pub async fn retry_failed(&self, limit: Option<u32>) -> CallResult {
        self.run(sync::RETRY_FAILED, &[opt(limit)]).await
    }

    /// Drop every queued sync item
    pub async fn clear_queue(&self) -> CallResult {
        self.run(sync::CLEAR_QUEUE, &[]).await
    }
}

impl System<'_> {
    /// Host and hardware information
    pub async fn get_info(&self) -> CallResult {
        self.run(system::GET_INFO, &[]).await
    }

    /// Application version
    pub async fn get_version(&self) -> CallResult {
        self.run(system::GET_VERSION, &[]).await
    }

    /// Ask the updater for a newer release
    pub async fn check_for_updates(&self) -> CallResult {
        self.run(system::CHECK_FOR_UPDATES, &[]).await
    }

    /// Install a downloaded update
    pub async fn install_update(&self) -> CallResult {
        self.run(system::INSTALL_UPDATE, &[]).await
    }

    /// Restart the application
    pub async fn restart(&self) -> CallResult {
        self.run(system::RESTART, &[]).await
    }

    /// Open a URL in the system browser
    pub async fn open_external(&self, url: &str) -> CallResult {
        self.run(system::OPEN_EXTERNAL, &[url.into()]).await
    }
}

impl Customers<'_> {
    /// Search by name or phone
    pub async fn search(&self, query: &str, limit: Option<u32>) -> CallResult {
        self.run(customers::SEARCH, &[query.into(), opt(limit)]).await
    }

    /// One customer
    pub async fn get_by_id(&self, customer_id: &str) -> CallResult {
        self.run(customers::GET_BY_ID, &[customer_id.into()]).await
    }

    /// Create a customer from an opaque document
    pub async fn create(&self, customer: Value) -> CallResult {
        self.run(customers::CREATE, &[customer]).await
    }

    /// Patch a customer
    pub async fn update(&self, customer_id: &str, updates: Value) -> CallResult {
        self.run(customers::UPDATE, &[customer_id.into(), updates]).await
    }

    /// Add a delivery address
    pub async fn add_address(&self, customer_id: &str, address: Value) -> CallResult {
        self.run(customers::ADD_ADDRESS, &[customer_id.into(), address]).await
    }
}

impl Reports<'_> {
    /// Sales summary for one day (defaults to today on the native side)
    pub async fn daily_summary(&self, date: Option<&str>, branch_id: Option<&str>) -> CallResult {
        self.run(reports::DAILY_SUMMARY, &[opt(date), opt(branch_id)]).await
    }

    /// End-of-shift Z report
    pub async fn z_report(&self, shift_id: &str) -> CallResult {
        self.run(reports::Z_REPORT, &[shift_id.into()]).await
    }

    /// Print a Z report
    pub async fn print_z_report(&self, shift_id: &str, printer_id: Option<&str>) -> CallResult {
        self.run(reports::PRINT_Z_REPORT, &[shift_id.into(), opt(printer_id)])
            .await
    }

    /// Sales between two dates
    pub async fn sales_by_period(&self, from: &str, to: &str) -> CallResult {
        self.run(reports::SALES_BY_PERIOD, &[from.into(), to.into()]).await
    }
}
