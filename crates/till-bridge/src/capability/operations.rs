//! Built-in POS operation table
//!
//! Grouped by namespace. Native command names are the desktop shell's
//! command identifiers; field aliases are the property names legacy call
//! sites are known to use.

use super::OperationSpec;
use crate::normalize::{ArgShape, FieldSpec};

const ORDER_ID: FieldSpec = FieldSpec::named("orderId").aliases(&["id", "order_id"]).at(0);
const SHIFT_ID: FieldSpec = FieldSpec::named("shiftId").aliases(&["id", "shift_id"]).at(0);
const PRINTER_ID: FieldSpec = FieldSpec::named("printerId").aliases(&["id", "printer_id"]).at(0);
const STAFF_ID_AT_1: FieldSpec = FieldSpec::named("staffId").aliases(&["staff_id", "userId"]).at(1);

const fn op(path: &'static str, command: &'static str, shape: ArgShape) -> OperationSpec {
    OperationSpec {
        path,
        command,
        shape,
    }
}

/// Order lifecycle
pub mod orders {
    use super::*;

    pub const CREATE: OperationSpec = op("orders.create", "order_create", ArgShape::Wrap { key: "orderData" });
    pub const GET_ALL: OperationSpec = op(
        "orders.get_all",
        "order_get_all",
        ArgShape::fields(&[
            FieldSpec::named("status").at(0),
            FieldSpec::named("since").aliases(&["fromDate"]).at(1),
        ]),
    );
    pub const GET_BY_ID: OperationSpec = op("orders.get_by_id", "order_get_by_id", ArgShape::fields(&[ORDER_ID]));
    pub const UPDATE_STATUS: OperationSpec = op(
        "orders.update_status",
        "order_update_status",
        ArgShape::fields(&[ORDER_ID, FieldSpec::named("status").aliases(&["newStatus"]).at(1)]),
    );
    pub const UPDATE_ITEMS: OperationSpec = op(
        "orders.update_items",
        "order_update_items",
        ArgShape::fields(&[ORDER_ID, FieldSpec::named("items").at(1)]),
    );
    pub const APPROVE: OperationSpec = op(
        "orders.approve",
        "order_approve",
        ArgShape::fields(&[
            ORDER_ID,
            FieldSpec::named("estimatedTime").aliases(&["eta", "prepTime"]).at(1),
        ]),
    );
    pub const DECLINE: OperationSpec = op(
        "orders.decline",
        "order_decline",
        ArgShape::fields(&[ORDER_ID, FieldSpec::named("reason").at(1)]),
    );
    pub const ASSIGN_DRIVER: OperationSpec = op(
        "orders.assign_driver",
        "order_assign_driver",
        ArgShape::fields(&[
            ORDER_ID,
            FieldSpec::named("driverId").aliases(&["driver_id"]).at(1),
            FieldSpec::named("notes").at(2),
        ]),
    );
    pub const DELETE: OperationSpec = op("orders.delete", "order_delete", ArgShape::fields(&[ORDER_ID]));
    pub const GET_PENDING: OperationSpec = op("orders.get_pending", "order_get_pending", ArgShape::NoPayload);
}

/// Cashier shift accounting
pub mod shifts {
    use super::*;

    pub const OPEN: OperationSpec = op(
        "shifts.open",
        "shift_open",
        ArgShape::fields(&[
            FieldSpec::named("staffId").aliases(&["staff_id", "userId"]).at(0),
            FieldSpec::named("openingCash").aliases(&["startingCash", "opening_cash"]).at(1),
            FieldSpec::named("branchId").aliases(&["branch_id"]).at(2),
            FieldSpec::named("terminalId").aliases(&["terminal_id"]).at(3),
        ]),
    );
    pub const CLOSE: OperationSpec = op(
        "shifts.close",
        "shift_close",
        ArgShape::fields(&[
            SHIFT_ID,
            FieldSpec::named("closingCash").aliases(&["countedCash", "closing_cash"]).at(1),
            FieldSpec::named("closedBy").aliases(&["closed_by"]).at(2),
        ]),
    );
    pub const GET_ACTIVE: OperationSpec = op(
        "shifts.get_active",
        "shift_get_active",
        ArgShape::fields(&[FieldSpec::named("staffId").aliases(&["staff_id", "userId"]).at(0)]),
    );
    pub const GET_SUMMARY: OperationSpec = op("shifts.get_summary", "shift_get_summary", ArgShape::fields(&[SHIFT_ID]));
    pub const RECORD_EXPENSE: OperationSpec = op(
        "shifts.record_expense",
        "shift_record_expense",
        ArgShape::enveloped(
            "expense",
            &[
                SHIFT_ID,
                FieldSpec::named("amount").at(1),
                FieldSpec::named("description").aliases(&["reason"]).at(2),
                FieldSpec::named("category").aliases(&["expenseType"]).at(3),
            ],
        ),
    );
    pub const GET_EXPENSES: OperationSpec = op("shifts.get_expenses", "shift_get_expenses", ArgShape::fields(&[SHIFT_ID]));
}

/// Payment capture and refunds
pub mod payments {
    use super::*;

    const PAYMENT_ID: FieldSpec = FieldSpec::named("paymentId").aliases(&["id", "payment_id"]).at(0);

    pub const PROCESS: OperationSpec = op("payments.process", "payment_process", ArgShape::Wrap { key: "paymentData" });
    pub const REFUND: OperationSpec = op(
        "payments.refund",
        "payment_refund",
        ArgShape::enveloped(
            "request",
            &[PAYMENT_ID, FieldSpec::named("amount").at(1), FieldSpec::named("reason").at(2)],
        ),
    );
    pub const VOID: OperationSpec = op(
        "payments.void",
        "payment_void",
        ArgShape::fields(&[PAYMENT_ID, FieldSpec::named("reason").at(1)]),
    );
    pub const GET_BY_ORDER: OperationSpec = op("payments.get_by_order", "payment_get_by_order", ArgShape::fields(&[ORDER_ID]));
    pub const RECEIPT_PREVIEW: OperationSpec = op(
        "payments.receipt_preview",
        "payment_receipt_preview",
        ArgShape::fields(&[ORDER_ID]),
    );
}

/// Printer management and printing
pub mod printers {
    use super::*;

    pub const LIST: OperationSpec = op("printers.list", "printer_list", ArgShape::NoPayload);
    pub const DISCOVER: OperationSpec = op(
        "printers.discover",
        "printer_discover",
        ArgShape::fields(&[FieldSpec::named("timeoutMs").aliases(&["timeout"]).at(0)]),
    );
    pub const ADD: OperationSpec = op("printers.add", "printer_add", ArgShape::Wrap { key: "printerConfig" });
    pub const REMOVE: OperationSpec = op("printers.remove", "printer_remove", ArgShape::fields(&[PRINTER_ID]));
    pub const TEST: OperationSpec = op("printers.test", "printer_test", ArgShape::fields(&[PRINTER_ID]));
    pub const SET_DEFAULT: OperationSpec = op(
        "printers.set_default",
        "printer_set_default",
        ArgShape::fields(&[PRINTER_ID, FieldSpec::named("role").at(1)]),
    );
    pub const GET_STATUS: OperationSpec = op("printers.get_status", "printer_get_status", ArgShape::fields(&[PRINTER_ID]));
    pub const PRINT_RECEIPT: OperationSpec = op(
        "printers.print_receipt",
        "printer_print_receipt",
        ArgShape::fields(&[
            ORDER_ID,
            FieldSpec::named("printerId").aliases(&["printer_id"]).at(1),
            FieldSpec::named("copies").at(2),
        ]),
    );
    pub const PRINT_KITCHEN_TICKET: OperationSpec = op(
        "printers.print_kitchen_ticket",
        "printer_print_kitchen_ticket",
        ArgShape::fields(&[ORDER_ID, FieldSpec::named("printerId").aliases(&["printer_id"]).at(1)]),
    );
    pub const OPEN_CASH_DRAWER: OperationSpec = op(
        "printers.open_cash_drawer",
        "printer_open_cash_drawer",
        ArgShape::fields(&[PRINTER_ID]),
    );
}

/// Menu catalogue
pub mod menu {
    use super::*;

    const ITEM_ID: FieldSpec = FieldSpec::named("itemId").aliases(&["id", "item_id"]).at(0);

    pub const GET_CATEGORIES: OperationSpec = op("menu.get_categories", "menu_get_categories", ArgShape::NoPayload);
    pub const GET_ITEMS: OperationSpec = op(
        "menu.get_items",
        "menu_get_items",
        ArgShape::fields(&[FieldSpec::named("categoryId").aliases(&["category_id", "category"]).at(0)]),
    );
    pub const GET_ITEM: OperationSpec = op("menu.get_item", "menu_get_item", ArgShape::fields(&[ITEM_ID]));
    pub const UPDATE_AVAILABILITY: OperationSpec = op(
        "menu.update_availability",
        "menu_update_availability",
        ArgShape::fields(&[ITEM_ID, FieldSpec::named("available").aliases(&["isAvailable"]).at(1)]),
    );
    pub const SYNC: OperationSpec = op("menu.sync", "menu_sync", ArgShape::NoPayload);
}

/// Terminal settings
pub mod settings {
    use super::*;

    const KEY: FieldSpec = FieldSpec::named("key").aliases(&["settingKey"]).at(0);

    pub const GET: OperationSpec = op(
        "settings.get",
        "settings_get",
        ArgShape::fields(&[KEY, FieldSpec::named("category").aliases(&["settingType"]).at(1)]),
    );
    pub const GET_ALL: OperationSpec = op(
        "settings.get_all",
        "settings_get_all",
        ArgShape::fields(&[FieldSpec::named("category").aliases(&["settingType"]).at(0)]),
    );
    pub const UPDATE: OperationSpec = op(
        "settings.update",
        "settings_update",
        ArgShape::fields(&[
            KEY,
            FieldSpec::named("value").aliases(&["settingValue"]).at(1),
            FieldSpec::named("category").aliases(&["settingType"]).at(2),
        ]),
    );
    pub const RESET: OperationSpec = op("settings.reset", "settings_reset", ArgShape::NoPayload);
    pub const GET_TERMINAL_CONFIG: OperationSpec = op(
        "settings.get_terminal_config",
        "settings_get_terminal_config",
        ArgShape::NoPayload,
    );
}

/// Staff authentication
pub mod auth {
    use super::*;

    const PIN: FieldSpec = FieldSpec::named("pin").aliases(&["password"]).at(0);

    pub const LOGIN: OperationSpec = op("auth.login", "auth_login", ArgShape::fields(&[PIN, STAFF_ID_AT_1]));
    pub const LOGOUT: OperationSpec = op("auth.logout", "auth_logout", ArgShape::NoPayload);
    pub const GET_SESSION: OperationSpec = op("auth.get_session", "auth_get_session", ArgShape::NoPayload);
    pub const VALIDATE_PIN: OperationSpec = op("auth.validate_pin", "auth_validate_pin", ArgShape::fields(&[PIN, STAFF_ID_AT_1]));
    pub const CHECK_PERMISSION: OperationSpec = op(
        "auth.check_permission",
        "auth_check_permission",
        ArgShape::fields(&[FieldSpec::named("permission").aliases(&["action"]).at(0), STAFF_ID_AT_1]),
    );
}

/// Cloud synchronization
pub mod sync {
    use super::*;

    pub const FORCE: OperationSpec = op("sync.force", "sync_force", ArgShape::NoPayload);
    pub const GET_STATUS: OperationSpec = op("sync.get_status", "sync_get_status", ArgShape::NoPayload);
    pub const RETRY_FAILED: OperationSpec = op(
        "sync.retry_failed",
        "sync_retry_failed",
        ArgShape::fields(&[FieldSpec::named("limit").at(0)]),
    );
    pub const CLEAR_QUEUE: OperationSpec = op("sync.clear_queue", "sync_clear_queue", ArgShape::NoPayload);
}

/// Application lifecycle and host information
pub mod system {
    use super::*;

    pub const GET_INFO: OperationSpec = op("system.get_info", "system_get_info", ArgShape::NoPayload);
    pub const GET_VERSION: OperationSpec = op("system.get_version", "system_get_version", ArgShape::NoPayload);
    pub const CHECK_FOR_UPDATES: OperationSpec = op("system.check_for_updates", "update_check", ArgShape::NoPayload);
    pub const INSTALL_UPDATE: OperationSpec = op("system.install_update", "update_install", ArgShape::NoPayload);
    pub const RESTART: OperationSpec = op("system.restart", "app_restart", ArgShape::NoPayload);
    pub const OPEN_EXTERNAL: OperationSpec = op(
        "system.open_external",
        "system_open_external",
        ArgShape::fields(&[FieldSpec::named("url").aliases(&["href"]).at(0)]),
    );
}

/// Customer directory
pub mod customers {
    use super::*;

    const CUSTOMER_ID: FieldSpec = FieldSpec::named("customerId").aliases(&["id", "customer_id"]).at(0);

    pub const SEARCH: OperationSpec = op(
        "customers.search",
        "customer_search",
        ArgShape::fields(&[
            FieldSpec::named("query").aliases(&["term", "phone"]).at(0),
            FieldSpec::named("limit").at(1),
        ]),
    );
    pub const GET_BY_ID: OperationSpec = op("customers.get_by_id", "customer_get_by_id", ArgShape::fields(&[CUSTOMER_ID]));
    pub const CREATE: OperationSpec = op("customers.create", "customer_create", ArgShape::Wrap { key: "customerData" });
    pub const UPDATE: OperationSpec = op(
        "customers.update",
        "customer_update",
        ArgShape::fields(&[CUSTOMER_ID, FieldSpec::named("updates").at(1)]),
    );
    pub const ADD_ADDRESS: OperationSpec = op(
        "customers.add_address",
        "customer_add_address",
        ArgShape::fields(&[CUSTOMER_ID, FieldSpec::named("address").at(1)]),
    );
}

/// End-of-day and period reporting
pub mod reports {
    use super::*;

    pub const DAILY_SUMMARY: OperationSpec = op(
        "reports.daily_summary",
        "report_daily_summary",
        ArgShape::fields(&[
            FieldSpec::named("date").at(0),
            FieldSpec::named("branchId").aliases(&["branch_id"]).at(1),
        ]),
    );
    pub const Z_REPORT: OperationSpec = op("reports.z_report", "report_z_report", ArgShape::fields(&[SHIFT_ID]));
    pub const PRINT_Z_REPORT: OperationSpec = op(
        "reports.print_z_report",
        "report_print_z_report",
        ArgShape::fields(&[SHIFT_ID, FieldSpec::named("printerId").aliases(&["printer_id"]).at(1)]),
    );
    pub const SALES_BY_PERIOD: OperationSpec = op(
        "reports.sales_by_period",
        "report_sales_by_period",
        ArgShape::fields(&[
            FieldSpec::named("from").aliases(&["startDate"]).at(0),
            FieldSpec::named("to").aliases(&["endDate"]).at(1),
        ]),
    );
}

/// Every built-in operation
pub const ALL: &[OperationSpec] = &[
    orders::CREATE,
    orders::GET_ALL,
    orders::GET_BY_ID,
    orders::UPDATE_STATUS,
    orders::UPDATE_ITEMS,
    orders::APPROVE,
    orders::DECLINE,
    orders::ASSIGN_DRIVER,
    orders::DELETE,
    orders::GET_PENDING,
    shifts::OPEN,
    shifts::CLOSE,
    shifts::GET_ACTIVE,
    shifts::GET_SUMMARY,
    shifts::RECORD_EXPENSE,
    shifts::GET_EXPENSES,
    payments::PROCESS,
    payments::REFUND,
    payments::VOID,
    payments::GET_BY_ORDER,
    payments::RECEIPT_PREVIEW,
    printers::LIST,
    printers::DISCOVER,
    printers::ADD,
    printers::REMOVE,
    printers::TEST,
    printers::SET_DEFAULT,
    printers::GET_STATUS,
    printers::PRINT_RECEIPT,
    printers::PRINT_KITCHEN_TICKET,
    printers::OPEN_CASH_DRAWER,
    menu::GET_CATEGORIES,
    menu::GET_ITEMS,
    menu::GET_ITEM,
    menu::UPDATE_AVAILABILITY,
    menu::SYNC,
    settings::GET,
    settings::GET_ALL,
    settings::UPDATE,
    settings::RESET,
    settings::GET_TERMINAL_CONFIG,
    auth::LOGIN,
    auth::LOGOUT,
    auth::GET_SESSION,
    auth::VALIDATE_PIN,
    auth::CHECK_PERMISSION,
    sync::FORCE,
    sync::GET_STATUS,
    sync::RETRY_FAILED,
    sync::CLEAR_QUEUE,
    system::GET_INFO,
    system::GET_VERSION,
    system::CHECK_FOR_UPDATES,
    system::INSTALL_UPDATE,
    system::RESTART,
    system::OPEN_EXTERNAL,
    customers::SEARCH,
    customers::GET_BY_ID,
    customers::CREATE,
    customers::UPDATE,
    customers::ADD_ADDRESS,
    reports::DAILY_SUMMARY,
    reports::Z_REPORT,
    reports::PRINT_Z_REPORT,
    reports::SALES_BY_PERIOD,
];
