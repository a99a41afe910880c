//! Literal legacy channel table.
//!
//! Namespaced names (`order:approve`) and the older generic names
//! (`approve-order`) alias the same capability.

/// (legacy channel, capability path)
pub(crate) const COMMAND_CHANNELS: &[(&str, &str)] = &[
    // orders
    ("order:create", "orders.create"),
    ("create-order", "orders.create"),
    ("order:get-all", "orders.get_all"),
    ("get-orders", "orders.get_all"),
    ("order:get-by-id", "orders.get_by_id"),
    ("get-order", "orders.get_by_id"),
    ("order:update-status", "orders.update_status"),
    ("update-order-status", "orders.update_status"),
    ("order:update-items", "orders.update_items"),
    ("order:approve", "orders.approve"),
    ("approve-order", "orders.approve"),
    ("order:decline", "orders.decline"),
    ("decline-order", "orders.decline"),
    ("order:assign-driver", "orders.assign_driver"),
    ("order:delete", "orders.delete"),
    ("delete-order", "orders.delete"),
    ("order:get-pending", "orders.get_pending"),
    ("get-pending-orders", "orders.get_pending"),
    // shifts
    ("shift:open", "shifts.open"),
    ("open-shift", "shifts.open"),
    ("shift:close", "shifts.close"),
    ("close-shift", "shifts.close"),
    ("shift:get-active", "shifts.get_active"),
    ("get-active-shift", "shifts.get_active"),
    ("shift:get-summary", "shifts.get_summary"),
    ("shift:record-expense", "shifts.record_expense"),
    ("record-expense", "shifts.record_expense"),
    ("shift:get-expenses", "shifts.get_expenses"),
    // payments
    ("payment:process", "payments.process"),
    ("process-payment", "payments.process"),
    ("payment:refund", "payments.refund"),
    ("refund-payment", "payments.refund"),
    ("payment:void", "payments.void"),
    ("payment:get-by-order", "payments.get_by_order"),
    ("get-order-payments", "payments.get_by_order"),
    ("payment:receipt-preview", "payments.receipt_preview"),
    // printers
    ("printer:list", "printers.list"),
    ("get-printers", "printers.list"),
    ("printer:discover", "printers.discover"),
    ("discover-printers", "printers.discover"),
    ("printer:add", "printers.add"),
    ("printer:remove", "printers.remove"),
    ("printer:test", "printers.test"),
    ("test-printer", "printers.test"),
    ("printer:set-default", "printers.set_default"),
    ("printer:get-status", "printers.get_status"),
    ("get-printer-status", "printers.get_status"),
    ("printer:print-receipt", "printers.print_receipt"),
    ("print-receipt", "printers.print_receipt"),
    ("printer:print-kitchen-ticket", "printers.print_kitchen_ticket"),
    ("print-kitchen-ticket", "printers.print_kitchen_ticket"),
    ("printer:open-cash-drawer", "printers.open_cash_drawer"),
    ("open-cash-drawer", "printers.open_cash_drawer"),
    // menu
    ("menu:get-categories", "menu.get_categories"),
    ("get-menu-categories", "menu.get_categories"),
    ("menu:get-items", "menu.get_items"),
    ("get-menu-items", "menu.get_items"),
    ("menu:get-item", "menu.get_item"),
    ("menu:update-availability", "menu.update_availability"),
    ("menu:sync", "menu.sync"),
    ("sync-menu", "menu.sync"),
    // settings
    ("settings:get", "settings.get"),
    ("get-settings", "settings.get"),
    ("get-setting", "settings.get"),
    ("settings:get-all", "settings.get_all"),
    ("get-all-settings", "settings.get_all"),
    ("settings:update", "settings.update"),
    ("settings:set", "settings.update"),
    ("update-settings", "settings.update"),
    ("settings:reset", "settings.reset"),
    ("settings:get-terminal-config", "settings.get_terminal_config"),
    ("get-terminal-config", "settings.get_terminal_config"),
    // auth
    ("auth:login", "auth.login"),
    ("login", "auth.login"),
    ("auth:logout", "auth.logout"),
    ("logout", "auth.logout"),
    ("auth:get-session", "auth.get_session"),
    ("get-current-session", "auth.get_session"),
    ("auth:validate-pin", "auth.validate_pin"),
    ("auth:check-permission", "auth.check_permission"),
    // sync
    ("sync:force", "sync.force"),
    ("force-sync", "sync.force"),
    ("sync:get-status", "sync.get_status"),
    ("get-sync-status", "sync.get_status"),
    ("sync:retry-failed", "sync.retry_failed"),
    ("sync:clear-queue", "sync.clear_queue"),
    // system
    ("system:get-info", "system.get_info"),
    ("get-system-info", "system.get_info"),
    ("app:get-version", "system.get_version"),
    ("get-app-version", "system.get_version"),
    ("update:check", "system.check_for_updates"),
    ("check-for-updates", "system.check_for_updates"),
    ("update:install", "system.install_update"),
    ("install-update", "system.install_update"),
    ("app:restart", "system.restart"),
    ("restart-app", "system.restart"),
    ("system:open-external", "system.open_external"),
    ("open-external", "system.open_external"),
    // customers
    ("customer:search", "customers.search"),
    ("search-customers", "customers.search"),
    ("customer:get-by-id", "customers.get_by_id"),
    ("customer:create", "customers.create"),
    ("create-customer", "customers.create"),
    ("customer:update", "customers.update"),
    ("customer:add-address", "customers.add_address"),
    // reports
    ("report:daily-summary", "reports.daily_summary"),
    ("get-daily-summary", "reports.daily_summary"),
    ("report:z-report", "reports.z_report"),
    ("generate-z-report", "reports.z_report"),
    ("report:print-z-report", "reports.print_z_report"),
    ("report:sales-by-period", "reports.sales_by_period"),
];

/// (legacy channel, native event name)
pub(crate) const EVENT_CHANNELS: &[(&str, &str)] = &[
    ("order-created", "order_created"),
    ("order-status-updated", "order_status_updated"),
    ("order-deleted", "order_deleted"),
    ("order-realtime-update", "order_realtime_update"),
    ("shift-updated", "shift_updated"),
    ("payment-completed", "payment_completed"),
    ("printer-status-changed", "printer_status_changed"),
    ("menu-updated", "menu_updated"),
    ("settings-updated", "settings_updated"),
    ("sync:status", "sync_status"),
    ("sync:complete", "sync_complete"),
    ("sync:error", "sync_error"),
    ("network-status", "network_status"),
    ("update-available", "update_available"),
    ("update-downloaded", "update_downloaded"),
    ("session-expired", "auth_session_expired"),
    ("customer-updated", "customer_updated"),
    ("notification", "app_notification"),
];
