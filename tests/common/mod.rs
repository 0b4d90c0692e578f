//! Shared fixtures: a small campus with a category tree and one account per
//! role.
#![allow(dead_code)]

use fake::faker::name::en::Name;
use fake::Fake;

use ombud::{Account, Category, Desk, MemoryStore, Priority, Role, Store, SubCategory};

pub struct Campus {
    pub desk: Desk<MemoryStore>,
    pub student: Account,
    pub faculty: Account,
    pub other_faculty: Account,
    pub hod: Account,
    pub admin: Account,
    /// "Hostel", bound to `other_faculty`.
    pub category: Category,
    /// "Room Maintenance" under Hostel, priority High, bound to `faculty`.
    pub subcategory: SubCategory,
    /// "Transport", no faculty bound anywhere.
    pub bare_category: Category,
}

pub fn account(username: &str, role: Role) -> Account {
    let full_name: String = Name().fake();
    Account::new(username, full_name, role)
}

pub fn campus() -> Campus {
    let store = MemoryStore::new();

    let student = account("student1", Role::Student);
    let faculty = account("faculty1", Role::Faculty);
    let other_faculty = account("faculty2", Role::Faculty);
    let hod = account("hod1", Role::Hod);
    let admin = account("admin1", Role::Admin);
    for acct in [&student, &faculty, &other_faculty, &hod, &admin] {
        store.insert_account(acct.clone()).unwrap();
    }

    let category = Category::with_faculty("Hostel", other_faculty.id);
    let subcategory =
        SubCategory::new(category.id, "Room Maintenance", Priority::High).with_faculty(faculty.id);
    let bare_category = Category::new("Transport");
    store.insert_category(category.clone()).unwrap();
    store.insert_category(bare_category.clone()).unwrap();
    store.insert_subcategory(subcategory.clone()).unwrap();

    Campus {
        desk: Desk::new(store).unwrap(),
        student,
        faculty,
        other_faculty,
        hod,
        admin,
        category,
        subcategory,
        bare_category,
    }
}
