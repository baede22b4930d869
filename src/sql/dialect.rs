//! SQL dialect selection.

use serde::{Deserialize, Serialize};

/// SQL dialect variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
    MariaDB,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::MySQL,
        Dialect::PostgreSQL,
        Dialect::SQLite,
        Dialect::MariaDB,
    ];

    /// Parse dialect from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mysql" => Some(Self::MySQL),
            "postgres" | "postgresql" => Some(Self::PostgreSQL),
            "sqlite" => Some(Self::SQLite),
            "mariadb" => Some(Self::MariaDB),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MySQL => "MySQL",
            Self::PostgreSQL => "PostgreSQL",
            Self::SQLite => "SQLite",
            Self::MariaDB => "MariaDB",
        }
    }

    /// Backtick-quoted identifiers and `#` line comments.
    pub(crate) fn is_mysql_family(self) -> bool {
        matches!(self, Self::MySQL | Self::MariaDB)
    }

    /// Sample script shown when the editor starts empty.
    pub fn example_sql(self) -> &'static str {
        match self {
            Self::MySQL => MYSQL_EXAMPLE,
            Self::PostgreSQL => POSTGRES_EXAMPLE,
            Self::SQLite => SQLITE_EXAMPLE,
            Self::MariaDB => MARIADB_EXAMPLE,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const MYSQL_EXAMPLE: &str = "\
CREATE TABLE authors (
  id INT AUTO_INCREMENT PRIMARY KEY,
  name VARCHAR(100) NOT NULL
);

CREATE TABLE tags (
  id INT AUTO_INCREMENT PRIMARY KEY,
  name VARCHAR(50) NOT NULL UNIQUE
);

CREATE TABLE profiles (
  id INT AUTO_INCREMENT PRIMARY KEY,
  author_id INT UNIQUE,
  bio TEXT,
  FOREIGN KEY (author_id) REFERENCES authors(id)
);

CREATE TABLE books (
  id INT AUTO_INCREMENT PRIMARY KEY,
  title VARCHAR(200) NOT NULL,
  author_id INT,
  FOREIGN KEY (author_id) REFERENCES authors(id)
);

CREATE TABLE book_tags (
  book_id INT,
  tag_id INT,
  PRIMARY KEY (book_id, tag_id),
  FOREIGN KEY (book_id) REFERENCES books(id),
  FOREIGN KEY (tag_id) REFERENCES tags(id)
);";

const POSTGRES_EXAMPLE: &str = "\
CREATE TABLE customers (
  id SERIAL PRIMARY KEY,
  name VARCHAR(100) NOT NULL
);

CREATE TABLE products (
  id SERIAL PRIMARY KEY,
  name VARCHAR(100),
  price NUMERIC(10,2)
);

CREATE TABLE addresses (
  id SERIAL PRIMARY KEY,
  customer_id INT UNIQUE,
  street TEXT,
  city TEXT,
  FOREIGN KEY (customer_id) REFERENCES customers(id)
);

CREATE TABLE orders (
  id SERIAL PRIMARY KEY,
  customer_id INT,
  order_date TIMESTAMP DEFAULT NOW(),
  FOREIGN KEY (customer_id) REFERENCES customers(id)
);

CREATE TABLE order_products (
  order_id INT,
  product_id INT,
  PRIMARY KEY (order_id, product_id),
  FOREIGN KEY (order_id) REFERENCES orders(id),
  FOREIGN KEY (product_id) REFERENCES products(id)
);";

const SQLITE_EXAMPLE: &str = "\
CREATE TABLE doctors (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL
);

CREATE TABLE tags (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL
);

CREATE TABLE licenses (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  doctor_id INTEGER UNIQUE,
  license_number TEXT,
  FOREIGN KEY (doctor_id) REFERENCES doctors(id)
);

CREATE TABLE appointments (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  doctor_id INTEGER,
  patient_name TEXT,
  appointment_date TEXT,
  FOREIGN KEY (doctor_id) REFERENCES doctors(id)
);

CREATE TABLE appointment_tags (
  appointment_id INTEGER,
  tag_id INTEGER,
  PRIMARY KEY (appointment_id, tag_id),
  FOREIGN KEY (appointment_id) REFERENCES appointments(id),
  FOREIGN KEY (tag_id) REFERENCES tags(id)
);";

const MARIADB_EXAMPLE: &str = "\
CREATE TABLE employees (
  id INT AUTO_INCREMENT PRIMARY KEY,
  name VARCHAR(100) NOT NULL
);

CREATE TABLE labels (
  id INT AUTO_INCREMENT PRIMARY KEY,
  name VARCHAR(50) NOT NULL UNIQUE
);

CREATE TABLE passports (
  id INT AUTO_INCREMENT PRIMARY KEY,
  employee_id INT UNIQUE,
  number VARCHAR(50),
  FOREIGN KEY (employee_id) REFERENCES employees(id)
);

CREATE TABLE tasks (
  id INT AUTO_INCREMENT PRIMARY KEY,
  title VARCHAR(200),
  employee_id INT,
  FOREIGN KEY (employee_id) REFERENCES employees(id)
);

CREATE TABLE task_labels (
  task_id INT,
  label_id INT,
  PRIMARY KEY (task_id, label_id),
  FOREIGN KEY (task_id) REFERENCES tasks(id),
  FOREIGN KEY (label_id) REFERENCES labels(id)
);";
