use chrono::{Duration, Utc};
use clap::Parser;
use colored::Colorize;
use lending_system::{
    Book, BookCategory, ConsoleLogger, FineManager, Library, MembershipTier, User,
};

/// Command-line arguments for the lending demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Walk through the membership borrow caps
    #[arg(long)]
    membership_demo: bool,

    /// Price a few overdue returns
    #[arg(long)]
    fines_demo: bool,

    /// Print a borrower's loan history as JSON at the end
    #[arg(long)]
    show_history: bool,
}

fn main() {
    let args = Args::parse();

    println!("{}", "Library Lending Demonstration".green().bold());
    println!("=====================================");

    basic_demo(args.show_history);

    if args.membership_demo {
        membership_demo();
    }

    if args.fines_demo {
        fines_demo();
    }

    println!("\n{}", "Demonstration complete!".green().bold());
}

/// Seed the sample catalog and user roster
fn seed_library(library: &mut Library) {
    let books = [
        Book::new("The Great Gatsby", "F. Scott Fitzgerald", BookCategory::Fiction),
        Book::new("Sapiens", "Yuval Noah Harari", BookCategory::NonFiction),
        Book::new("Encyclopedia", "Various Authors", BookCategory::Reference),
    ];
    for book in books {
        if let Err(error) = library.add_book(book) {
            println!("Error: {error}");
        }
    }

    let users = [
        User::new("1", "Alice", Some(MembershipTier::Basic)),
        User::new("2", "Bob", Some(MembershipTier::Premium)),
        User::new("3", "Carol", Some(MembershipTier::Platinum)),
    ];
    for user in users {
        if let Err(error) = library.register_user(user) {
            println!("Error: {error}");
        }
    }
}

/// Run a borrow/return cycle, including a double-loan rejection
fn basic_demo(show_history: bool) {
    println!("{}", "\nRunning the basic lending cycle...".yellow().bold());

    let mut library = Library::new(Box::new(ConsoleLogger), FineManager::default());
    seed_library(&mut library);

    println!();
    if let Err(error) = library.load_book("The Great Gatsby", "1") {
        println!("Error: {error}");
    }
    if let Err(error) = library.load_book("Sapiens", "2") {
        println!("Error: {error}");
    }

    // Bob tries to take a book that is already out
    if let Err(error) = library.load_book("The Great Gatsby", "2") {
        println!("Rejected as expected: {error}");
    }

    if let Err(error) = library.return_book("The Great Gatsby") {
        println!("Error: {error}");
    }
    if let Err(error) = library.return_book("Sapiens") {
        println!("Error: {error}");
    }

    // Returning a book nobody borrowed is refused, not fatal
    if let Err(error) = library.return_book("Encyclopedia") {
        println!("Rejected as expected: {error}");
    }

    if let Some(book) = library.find_book_by_title("Sapiens") {
        library.validate_book_title(book, "Sapiens");
    }

    if show_history {
        print_history(&library, "1");
    }
}

/// Show a Basic member hitting their two-book cap
fn membership_demo() {
    println!("{}", "\nWalking through the membership caps...".yellow().bold());

    let mut library = Library::new(Box::new(ConsoleLogger), FineManager::default());
    seed_library(&mut library);

    println!();
    if let Err(error) = library.load_book("The Great Gatsby", "1") {
        println!("Error: {error}");
    }
    if let Err(error) = library.load_book("Sapiens", "1") {
        println!("Error: {error}");
    }

    // The third concurrent loan is over the Basic cap
    if let Err(error) = library.load_book("Encyclopedia", "1") {
        println!("Rejected as expected: {error}");
    }
}

/// Price a few overdue scenarios with back-dated borrow timestamps
#[allow(clippy::arithmetic_side_effects)]
fn fines_demo() {
    println!("{}", "\nPricing overdue returns...".yellow().bold());

    let fines = FineManager::default();
    let now = Utc::now();

    for days_out in [5_i64, 7, 8, 10] {
        let borrowed_at = now - Duration::days(days_out);
        let fine = fines.fine_for(borrowed_at, now);
        println!("Returned after {days_out} days: fine ${fine}");
    }
}

/// Print a user's loan history as pretty JSON
fn print_history(library: &Library, user_id: &str) {
    let Some(user) = library.user(user_id) else {
        return;
    };

    println!("\nLoan history for {}:", user.name);
    match serde_json::to_string_pretty(user.loan_history()) {
        Ok(json) => println!("{json}"),
        Err(error) => println!("Error: {error}"),
    }
}
