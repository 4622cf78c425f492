//! Domain to DTO conversions.

use blog_core::domain::{Author, Category, CommentView, Location, PostView, User};
use blog_core::pagination::Paginated;
use blog_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, PageResponse,
    PostResponse, PublicProfile, UserResponse,
};

pub fn author(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
        created_at: category.created_at,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.is_published,
        created_at: location.created_at,
    }
}

pub fn post(view: PostView) -> PostResponse {
    let PostView {
        post,
        author: post_author,
        category: post_category,
        location: post_location,
        comment_count,
    } = view;

    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        image: post.image,
        is_published: post.is_published,
        created_at: post.created_at,
        author: author(post_author),
        category: post_category.map(category),
        location: post_location.map(location),
        comment_count,
    }
}

pub fn comment(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        post_id: view.comment.post_id,
        text: view.comment.text,
        created_at: view.comment.created_at,
        author: author(view.author),
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        is_staff: user.is_staff,
        created_at: user.created_at,
    }
}

pub fn profile(user: User) -> PublicProfile {
    PublicProfile {
        id: user.id,
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}

pub fn page<T, U>(page: Paginated<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(f);

    PageResponse {
        items: page.items,
        page: page.page,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next,
        has_previous,
    }
}
