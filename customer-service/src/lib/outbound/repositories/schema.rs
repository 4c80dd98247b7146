// Mirrors migrations/20240101000000_create_customer.sql

diesel::table! {
    customer (id) {
        id -> Int4,
        name -> Text,
        email -> Text,
        password -> Text,
        age -> Int4,
        gender -> Text,
    }
}
